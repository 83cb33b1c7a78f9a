//! Exercises [`idpool`] the way its collaborators do: an
//! external authority claiming and freeing IDs, and local
//! workers leasing IDs for fallible actions.

pub mod config;
pub mod error;

pub mod external;
pub mod workload;

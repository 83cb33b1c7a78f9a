//! Pool of integer identifiers shared between a local
//! allocator and an external source of truth.
//!
//! Every ID goes through three states: available, leased
//! and unavailable. See [`pool::IdPool`] for the transitions.

pub mod cache;
pub mod error;
pub mod id;
pub mod interface;
pub mod lease;
pub mod pool;

pub mod prelude {
    pub use crate::{
        cache::{
            IdCache,
            IdState,
            LeaseTicket,
        },
        error::RangeError,
        id::{
            Id,
            IdRange,
        },
        interface::SharedIdPool,
        lease::Lease,
        pool::IdPool,
    };
}

#[cfg(test)]
mod tests;

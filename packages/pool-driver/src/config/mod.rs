//! Driver configuration, loaded from TOML.
//!
//! - `[pool]` - managed range and IDs claimed by the external
//!   authority up front
//! - `[workload]` - worker count and per-worker rounds
//! - `[logging]`, `[runtime]` - process setup

/// Declares plain config structs: every field is public and
/// the struct is (de)serializable.
macro_rules! entity {
    (
        $(#[$outer_meta:meta])*
        struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_ident:ident : $field_tp:ty
            ),*
            $(,)?
        }

        $($tail:tt)*
    ) => {
        $(#[$outer_meta])*
        #[derive(Debug, serde::Serialize, serde::Deserialize)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field_ident : $field_tp
            ),*
        }

        entity!($($tail)*);
    };
    () => {};
}

pub mod logging;
pub mod pool;
pub mod runtime;
pub mod workload;

pub mod root;

pub use root::Config;

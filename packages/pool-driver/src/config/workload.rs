use std::num::{
    NonZeroU64,
    NonZeroUsize,
};

const fn def_fail_every() -> NonZeroU64 {
    match NonZeroU64::new(3) {
        Some(n) => n,
        None => NonZeroU64::MIN,
    }
}

entity! {
    struct WorkloadConfig {
        workers: NonZeroUsize,
        rounds: u64,

        /// Every Nth simulated external action fails and the
        /// leased ID gets released instead of used.
        #[serde(default = "def_fail_every")]
        fail_every: NonZeroU64,

        /// Number of allocate/release by name round trips per
        /// worker.
        #[serde(default)]
        named: u64,
    }
}

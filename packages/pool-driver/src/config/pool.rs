use idpool::id::{
    Id,
    IdRange,
};

entity! {
    /// Range managed by the pool and IDs already claimed by
    /// the external authority.
    struct PoolConfig {
        #[serde(flatten)]
        range: IdRange,

        #[serde(default)]
        reserved: Vec<Id>,
    }
}

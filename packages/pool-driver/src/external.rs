use idpool::{
    id::Id,
    interface::SharedIdPool,
};
use owo_colors::OwoColorize;

/// Withdraws IDs the external authority claims for itself.
/// Returns how many of them were available locally.
pub fn claim<P: SharedIdPool + ?Sized>(pool: &P, ids: &[Id]) -> usize {
    let claimed = ids.iter().filter(|&&id| pool.remove(id)).count();
    tracing::info!(
        "External authority claimed {} of {} reserved IDs",
        claimed.bold(),
        ids.len()
    );

    claimed
}

/// Re-admits IDs the external authority reported free.
/// Returns how many of them were unavailable before.
pub fn free<P: SharedIdPool + ?Sized>(pool: &P, ids: &[Id]) -> usize {
    let freed = ids.iter().filter(|&&id| pool.insert(id)).count();
    tracing::info!(
        "External authority freed {} of {} reserved IDs",
        freed.bold(),
        ids.len()
    );

    freed
}

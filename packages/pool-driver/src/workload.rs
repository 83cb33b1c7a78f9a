use std::{
    collections::HashSet,
    num::NonZeroU64,
    ops::AddAssign,
    sync::Arc,
};

use futures_util::future::join_all;
use idpool::{
    id::Id,
    lease::Lease,
    pool::IdPool,
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;

use crate::{
    config::workload::WorkloadConfig,
    error::DriverError,
};

/// IDs currently held by some worker. Used to detect double
/// issues.
type Outstanding = Arc<Mutex<HashSet<Id>>>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Leases committed with `use_id`.
    pub used: u64,

    /// Leases returned after a failed action.
    pub released: u64,

    /// Leases withdrawn by the external authority before commit.
    pub lost: u64,

    /// Attempts which found the pool empty.
    pub exhausted: u64,

    /// Completed allocate/release by name round trips.
    pub named: u64,
}

impl AddAssign for Report {
    fn add_assign(&mut self, rhs: Self) {
        self.used += rhs.used;
        self.released += rhs.released;
        self.lost += rhs.lost;
        self.exhausted += rhs.exhausted;
        self.named += rhs.named;
    }
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    rounds: u64,
    fail_every: NonZeroU64,
    named: u64,
}

/// Runs `config.workers` concurrent workers against the `pool`
/// and checks that nothing leaked afterwards.
pub async fn run(
    pool: Arc<IdPool>,
    config: &WorkloadConfig,
) -> Result<Report, DriverError> {
    let outstanding = Outstanding::default();
    let settings = Settings {
        rounds: config.rounds,
        fail_every: config.fail_every,
        named: config.named,
    };

    tracing::info!(
        "Starting {} workers over {}",
        config.workers.bold(),
        pool.range().bold()
    );
    let workers = (0..config.workers.get()).map(|worker| {
        tokio::spawn(run_worker(
            worker,
            Arc::clone(&pool),
            Arc::clone(&outstanding),
            settings,
        ))
    });

    let mut report = Report::default();
    for result in join_all(workers).await {
        report += result??;
    }

    match (pool.leased_count(), pool.members_len()) {
        (0, 0) => Ok(report),
        (0, members) => Err(DriverError::LeakedMembers(members)),
        (leased, _) => Err(DriverError::LeakedLeases(leased)),
    }
}

fn hold(outstanding: &Outstanding, id: Id) -> Result<(), DriverError> {
    let fresh = outstanding.lock().insert(id);
    if fresh {
        Ok(())
    } else {
        Err(DriverError::DoubleIssue(id))
    }
}

fn unhold(outstanding: &Outstanding, id: Id) {
    outstanding.lock().remove(&id);
}

async fn run_worker(
    worker: usize,
    pool: Arc<IdPool>,
    outstanding: Outstanding,
    settings: Settings,
) -> Result<Report, DriverError> {
    let mut report = Report::default();

    for round in 1..=settings.rounds {
        let Some(lease) = Lease::acquire(&*pool) else {
            report.exhausted += 1;
            tokio::task::yield_now().await;
            continue;
        };
        let id = lease.id();
        hold(&outstanding, id)?;

        // Simulated external action
        tokio::task::yield_now().await;
        unhold(&outstanding, id);

        if round % settings.fail_every.get() == 0 {
            tracing::trace!("worker {worker}: action for {} failed", id.bold());
            lease.release();
            report.released += 1;
        } else if let Some(id) = lease.commit() {
            report.used += 1;

            // Object is gone, the authority reports its ID free again
            pool.insert(id);
        } else {
            tracing::debug!("worker {worker}: lease of {} was lost", id.bold());
            report.lost += 1;
        }
    }

    for n in 0..settings.named {
        let name = format!("worker-{worker}/{n}");
        let Some(id) = pool.allocate_id(&name) else {
            report.exhausted += 1;
            tokio::task::yield_now().await;
            continue;
        };
        hold(&outstanding, id)?;

        tokio::task::yield_now().await;
        unhold(&outstanding, id);

        if !pool.release(id) {
            return Err(DriverError::NamedRelease(id));
        }
        report.named += 1;
    }

    tracing::debug!("worker {worker} finished: {report:?}");
    Ok(report)
}

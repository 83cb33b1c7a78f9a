use idpool::id::Id;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("ID {0} was handed out twice")]
    DoubleIssue(Id),

    #[error("{0} IDs are still leased after the workload finished")]
    LeakedLeases(usize),

    #[error("{0} named allocations are still registered after the workload finished")]
    LeakedMembers(usize),

    #[error("named ID {0} could not be released")]
    NamedRelease(Id),

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

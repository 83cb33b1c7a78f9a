use std::future::Future;

use color_eyre::eyre;
use tokio::task::JoinHandle;

/// Runs future and displays errors when they occur
pub fn run_fut<F, T>(name: &'static str, fut: F) -> JoinHandle<eyre::Result<T>>
where
    F: Future<Output = eyre::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(async move {
        let result = fut.await;
        if let Err(ref report) = result {
            tracing::error!("{name} exited with an error:\n{report}");
        }

        result
    })
}

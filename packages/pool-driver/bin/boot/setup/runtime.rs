use std::num::NonZeroUsize;

use color_eyre::eyre;
use pool_driver::config::root::Config;
use tokio::runtime::{
    Builder,
    Runtime,
};

/// Builds runtime for the workload. Defaults to one thread per
/// CPU, but never more threads than there are workers.
pub fn create_runtime(config: &Config) -> eyre::Result<Runtime> {
    let workers = config.workload.workers.get();
    let threads = config
        .runtime
        .threads
        .map_or_else(num_cpus::get, NonZeroUsize::get)
        .min(workers);

    tracing::debug!(
        "{workers} workers over {}, {} reserved IDs",
        config.pool.range,
        config.pool.reserved.len()
    );
    let mut builder = match threads {
        0 | 1 => {
            tracing::debug!("Picking single-threaded runtime");
            Builder::new_current_thread()
        }

        n => {
            tracing::debug!("Picking multi-threaded runtime ({n} threads)");
            let mut b = Builder::new_multi_thread();
            b.worker_threads(n);
            b
        }
    };

    builder
        .thread_name("idpool worker")
        .enable_all()
        .build()
        .map_err(From::from)
}

use std::{
    num::NonZeroUsize,
    path::PathBuf,
};

use color_eyre::eyre;
use pool_driver::config::root::Config;
use serde::Deserialize;

/// `IDPOOL_*` environment variables.
#[derive(Debug, Deserialize)]
pub struct Environment {
    /// `IDPOOL_CONFIG_PATH`
    pub config_path: Option<PathBuf>,

    /// `IDPOOL_WORKERS`, overrides `workload.workers`
    pub workers: Option<NonZeroUsize>,
}

impl Environment {
    pub fn try_parse() -> eyre::Result<Self> {
        envy::prefixed("IDPOOL_")
            .from_env()
            .map_err(From::from)
    }

    pub fn apply(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            tracing::debug!("Overriding worker count with {workers}");
            config.workload.workers = workers;
        }
    }
}

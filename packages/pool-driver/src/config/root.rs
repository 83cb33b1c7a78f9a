use std::{
    fs,
    path::Path,
};

use color_eyre::eyre;

use super::{
    logging::LoggingConfig,
    pool::PoolConfig,
    runtime::RuntimeConfig,
    workload::WorkloadConfig,
};

entity! {
    struct Config {
        pool: PoolConfig,
        workload: WorkloadConfig,
        logging: LoggingConfig,

        #[serde(default)]
        runtime: RuntimeConfig,
    }
}

impl Config {
    pub fn try_load(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading config from the {}", path.display());

        let contents = fs::read_to_string(path)?;
        Self::try_parse(&contents)
    }

    pub fn try_parse(contents: &str) -> eyre::Result<Self> {
        toml::from_str(contents).map_err(From::from)
    }
}

use std::sync::Arc;

use boot::{
    runner::run_fut,
    setup::{
        configuration::load_config,
        environment::Environment,
        logging::install_tracing,
        runtime::create_runtime,
    },
};
use color_eyre::eyre;
use idpool::pool::IdPool;
use owo_colors::OwoColorize;
use pool_driver::{
    config::root::Config,
    external,
    workload,
};

async fn entrypoint(config: Config) -> eyre::Result<()> {
    let Config { pool, workload, .. } = config;
    let reserved = pool.reserved;
    let pool = Arc::new(IdPool::with_range(pool.range));

    external::claim(&*pool, &reserved);

    let report = run_fut("workload", {
        let pool = Arc::clone(&pool);
        async move {
            workload::run(pool, &workload)
                .await
                .map_err(From::from)
        }
    })
    .await??;

    tracing::info!(
        "Workload finished: {} used, {} released, {} named, {} exhausted",
        report.used.bold(),
        report.released.bold(),
        report.named.bold(),
        report.exhausted.bold(),
    );

    external::free(&*pool, &reserved);
    tracing::info!("{} IDs available", pool.available_count().bold());

    Ok(())
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    let env = Environment::try_parse()?;
    let mut config = load_config(env.config_path.as_deref())?;
    install_tracing(&config.logging)?;
    env.apply(&mut config);

    let rt = create_runtime(&config)?;

    rt.block_on(entrypoint(config))
}

mod boot;

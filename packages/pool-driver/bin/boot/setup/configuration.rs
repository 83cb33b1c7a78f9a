use std::{
    path::Path,
    process,
};

use color_eyre::eyre;
use pool_driver::config::root::Config;

fn search_in_paths(paths: &[&Path]) -> Config {
    for path in paths {
        if let Ok(config) = Config::try_load(path) {
            return config;
        }
    }

    eprintln!("no usable config found, tried:");
    for path in paths {
        eprintln!(" - {}", path.display());
    }

    process::exit(1)
}

pub fn load_config(path: Option<&Path>) -> eyre::Result<Config> {
    match path {
        Some(exact_path) => Config::try_load(exact_path),
        None => Ok(search_in_paths(&[
            Path::new("/etc/idpool.toml"),
            Path::new("./idpool.toml"),
        ])),
    }
}

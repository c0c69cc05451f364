//! Logging collaborator (§6c): `env_logger`, honoring `RUST_LOG` and elevating to `debug`
//! when `KEYD_DEBUG` is set, matching §6's environment contract.

use std::env;

pub fn init() {
    let mut builder = env_logger::Builder::from_default_env();

    if env::var_os("KEYD_DEBUG").is_some() && env::var_os("RUST_LOG").is_none() {
        builder.filter_level(log::LevelFilter::Debug);
    }

    builder.init();
}

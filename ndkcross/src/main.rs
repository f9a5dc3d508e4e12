use std::env;

use anyhow::Result;
use env_logger::Env;

use crate::sdk::Sdk;

mod args;
mod crossfile;
mod ndk;
mod platform;
mod sdk;

#[cfg(test)]
mod fixture;

fn init_logger() {
    let level = if cfg!(debug_assertions) { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    init_logger();

    let args = args::parse();
    let sdk = Sdk::from_env()?;

    crossfile::write_all(&sdk, &args.abis, &env::current_dir()?)?;

    Ok(())
}

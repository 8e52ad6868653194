mod config;
mod connection;
mod location;
mod modules;
mod phases;
mod request;
mod response;
mod server;

use std::sync::Arc;

use anyhow::Context;

use log::{error, info};

fn build_engine(configuration: &config::Configuration) -> anyhow::Result<phases::PhaseEngine> {
    let modules = modules::create_modules(configuration.tree_configuration());

    let locations = location::Locations::new(configuration.locations(), &modules)
        .context("location configuration error")?;

    let phases = modules::register_handlers(&modules).context("module postconfiguration error")?;

    for phase in phases::Phase::ALL {
        info!("{} phase handlers {:?}", phase, phases.handler_names(phase));
    }

    Ok(phases::PhaseEngine::new(phases, locations))
}

async fn try_main() -> anyhow::Result<()> {
    let config_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./config/config.json".to_string());

    let configuration = config::read_configuration(config_file)
        .await
        .context("read_configuration error")?;

    let engine = Arc::new(build_engine(&configuration).context("build_engine error")?);

    let server = server::Server::new(engine, configuration.server_configuration());

    server.run().await
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_nanos()
        .init();

    info!("begin main");

    if let Err(err) = try_main().await {
        error!("fatal error in main:\n{:#}", err);
        std::process::exit(1);
    }
}

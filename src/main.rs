use std::sync::Arc;

use xml_resource_server::{api, config, logger, server};

const CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load_from(CONFIG_PATH)?;
    logger::init(&cfg.logging)?;

    // Build the Tokio runtime by hand so `server.workers` can size it
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let routes = api::routes()?;
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&addr, &cfg, &routes);

    let state = Arc::new(config::AppState::new(cfg, routes));
    server::signal::start_signal_handler(Arc::clone(&state.shutdown))?;

    server::run(listener, state).await?;
    Ok(())
}

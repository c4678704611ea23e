use std::sync::Arc;

use brooklin_site::config::{AppState, Config};
use brooklin_site::{logger, server};
use clap::Parser;
use tokio::sync::Notify;

#[derive(Debug, Parser)]
#[command(version, about = "Brooklin Pub site server")]
struct Cli {
    /// Configuration file path, extension optional
    #[arg(short, long, default_value = "config")]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?;
    logger::init(&cfg.logging)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(&cfg)?);

    if cfg.assets.install_on_startup {
        match state.assets.install(state.origin.as_ref()).await {
            Ok(count) => tracing::info!(
                cache = state.assets.name(),
                assets = count,
                "asset cache installed"
            ),
            Err(e) => logger::log_warning(&format!(
                "Asset cache install failed, serving from origin: {e}"
            )),
        }
    }

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::spawn_shutdown_listener(Arc::clone(&shutdown));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server_loop(listener, state, shutdown))
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

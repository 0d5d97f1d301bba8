use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use picfind::config::{AppState, Config, DEFAULT_CONFIG_PATH};
use picfind::{logger, server};

/// Config path from `--config <path>`, `--config=<path>` or the first argument
fn config_path_from_args(mut args: impl Iterator<Item = String>) -> String {
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            if let Some(path) = args.next() {
                return path;
            }
        } else if let Some(path) = arg.strip_prefix("--config=") {
            return path.to_string();
        } else if !arg.starts_with('-') {
            return arg;
        }
    }
    DEFAULT_CONFIG_PATH.to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path_from_args(std::env::args().skip(1));
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

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
    let listener = server::create_reusable_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg)?);

    if let Err(e) = state.scanner.scan().await {
        logger::log_warning(&format!("{e}; image queries will fail until it exists"));
    }

    logger::log_server_start(&addr, &cfg);

    // LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            server::start_signal_handler(Arc::clone(&state));
            server::start_server_loop(listener, state, Arc::new(AtomicUsize::new(0))).await;
        })
        .await;

    Ok(())
}

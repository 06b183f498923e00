use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::Notify;

use nocache_server::config::{AppState, Config};
use nocache_server::error::ServerError;
use nocache_server::{logger, server};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[FATAL] {e}");
            if e.is_addr_in_use() {
                eprintln!("[FATAL] Is another server already running on this port?");
            }
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ServerError> {
    let cfg = Config::load()?;
    logger::init(&cfg).map_err(ServerError::Logger)?;

    let addr = cfg.get_socket_addr().map_err(ServerError::InvalidAddress)?;
    let state = Arc::new(AppState::new(cfg)?);

    // Create the Tokio runtime, sizing the worker pool from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = state.config.server.workers.filter(|w| *w > 0) {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build().map_err(ServerError::Runtime)?;

    runtime.block_on(async_main(addr, state))
}

async fn async_main(addr: SocketAddr, state: Arc<AppState>) -> Result<(), ServerError> {
    let listener =
        server::create_listener(addr).map_err(|source| ServerError::Bind { addr, source })?;
    let local_addr = listener.local_addr().unwrap_or(addr);
    logger::log_server_start(&local_addr, &state.root, &state.config);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown)).map_err(ServerError::Runtime)?;

    server::serve(listener, state, shutdown).await;
    Ok(())
}

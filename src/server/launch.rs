// Launch module
// Process entry shared by both binaries: config, logger, runtime, serve

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::Instant;

use super::listener::create_reusable_listener;
use super::server_loop::start_server_loop;
use super::signal::start_signal_handler;
use crate::config::{AppState, Config};
use crate::handler::Handler;
use crate::logger;

/// How long in-flight connections may keep running after shutdown
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Load configuration, build the runtime and serve until a shutdown signal.
///
/// `make_handler` receives the loaded configuration and builds the handler
/// that answers every request.
pub fn run<H, F>(name: &str, make_handler: F) -> Result<(), Box<dyn Error>>
where
    H: Handler,
    F: FnOnce(&Config) -> H,
{
    let cfg = Config::load()?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    let handler = Arc::new(make_handler(&cfg));
    runtime.block_on(async_main(name, cfg, handler))
}

async fn async_main<H: Handler>(
    name: &str,
    cfg: Config,
    handler: Arc<H>,
) -> Result<(), Box<dyn Error>> {
    let addr = cfg.socket_addr()?;
    let listener = create_reusable_listener(addr)?;

    logger::log_server_start(name, &addr, &cfg, &handler.describe());
    logger::log_effective_config(&cfg);

    let state = Arc::new(AppState::new(cfg));
    start_signal_handler(Arc::clone(&state));

    // Connections are served by local tasks on this thread
    let local = tokio::task::LocalSet::new();
    local.run_until(serve(listener, state, handler)).await;
    Ok(())
}

/// Serve `listener` until shutdown, then let open connections finish.
///
/// Must run inside a `LocalSet`.
pub async fn serve<H: Handler>(listener: TcpListener, state: Arc<AppState>, handler: Arc<H>) {
    start_server_loop(listener, Arc::clone(&state), handler).await;
    drain_connections(&state, SHUTDOWN_GRACE).await;
}

/// Wait until no connection is active or `grace` has elapsed
async fn drain_connections(state: &AppState, grace: Duration) {
    let deadline = Instant::now() + grace;
    while state.connection_count() > 0 && Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
    logger::log_shutdown_complete(state.connection_count());
}

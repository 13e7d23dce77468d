// Server loop module
// Accepts connections until shutdown is requested

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::handler::Handler;
use crate::logger;

/// Accept connections and hand each one to `handler`.
///
/// Returns once [`AppState::request_shutdown`] has been called. Connections
/// already accepted keep running in their own local tasks.
pub async fn start_server_loop<H: Handler>(
    listener: TcpListener,
    state: Arc<AppState>,
    handler: Arc<H>,
) {
    while !state.is_shutdown_requested() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &handler);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = state.shutdown.notified() => {}
        }
    }
}

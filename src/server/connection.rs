// Connection handling module
// Accepts a single TCP connection and serves it with a handler

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::{TokioIo, TokioTimer};

use crate::config::AppState;
use crate::handler::Handler;
use crate::logger::{self, AccessLogEntry};

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `handler` - Produces the response for each request on the connection
pub fn accept_connection<H: Handler>(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    handler: &Arc<H>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(handler));
}

/// Handle a single connection in a spawned local task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 connection settings (keep-alive, request head timeout)
/// 3. Serves every request on the connection with the handler
/// 4. Decrements the connection counter when done
///
/// Only reading a request head is timed; a response body is sent for as
/// long as the client keeps reading it.
fn handle_connection<H: Handler>(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    handler: Arc<H>,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let header_timeout = (performance.header_read_timeout > 0)
            .then_some(Duration::from_secs(performance.header_read_timeout));

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(performance.keep_alive_timeout > 0)
            .header_read_timeout(header_timeout);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req: Request<Incoming>| {
                let state = Arc::clone(&service_state);
                let handler = Arc::clone(&handler);
                async move {
                    let started = Instant::now();
                    let (parts, _body) = req.into_parts();
                    let response = handler.handle(&parts).await;

                    let logging = &state.config.logging;
                    if logging.access_log {
                        let mut entry = AccessLogEntry::from_request(peer_addr, &parts);
                        entry.finish(
                            response.status(),
                            response.body().size_hint().exact(),
                            started.elapsed(),
                        );
                        logger::log_access(&entry, &logging.access_log_format);
                    }

                    Ok::<_, Infallible>(response)
                }
            }),
        );

        if let Err(err) = conn.await {
            logger::log_connection_error(&err);
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}

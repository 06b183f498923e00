// Connection handling module
// Serves a single accepted TCP connection on its own task

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::handler;
use crate::logger;
use crate::middleware::NoCache;

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Configures HTTP/1.1 keep-alive
/// 3. Serves the connection with the static file handler behind `NoCache`
/// 4. Applies the optional connection timeout
pub fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.performance.keep_alive);

        let timeout_secs = state.config.performance.connection_timeout;
        let service_state = Arc::clone(&state);
        let service = NoCache::new(service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&service_state), peer_addr)
        }));

        let conn = builder.serve_connection(io, service);

        let result = if timeout_secs > 0 {
            match tokio::time::timeout(Duration::from_secs(timeout_secs), conn).await {
                Ok(result) => result,
                Err(_) => {
                    logger::log_warning(&format!(
                        "Connection from {peer_addr} timed out after {timeout_secs} seconds"
                    ));
                    return;
                }
            }
        } else {
            conn.await
        };

        // Clients hanging up mid-request are routine
        if let Err(err) = result {
            if !err.is_incomplete_message() {
                logger::log_connection_error(&err);
            }
        }
    });
}

// Connection module
// Admission control and HTTP/1 serving for a single accepted TCP stream

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Holds one slot of the connection counter until dropped
struct ConnectionSlot(Arc<AtomicUsize>);

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Reserve a slot, or `None` when `max_connections` is already reached
fn reserve_slot(counter: &Arc<AtomicUsize>, max_connections: Option<u64>) -> Option<ConnectionSlot> {
    // Increment first, then check, so concurrent accepts cannot overshoot
    let previous = counter.fetch_add(1, Ordering::SeqCst);
    let slot = ConnectionSlot(Arc::clone(counter));
    match max_connections {
        Some(max) if previous >= usize::try_from(max).unwrap_or(usize::MAX) => {
            logger::log_warning(&format!(
                "Max connections reached: {previous}/{max}. Connection rejected."
            ));
            None
        }
        _ => Some(slot),
    }
}

/// Admit a connection and serve it on the local task set
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    active_connections: &Arc<AtomicUsize>,
) {
    let Some(slot) = reserve_slot(active_connections, state.config.performance.max_connections)
    else {
        drop(stream);
        return;
    };

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    tokio::task::spawn_local(serve_connection(stream, peer_addr, Arc::clone(state), slot));
}

async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    _slot: ConnectionSlot,
) {
    let io = TokioIo::new(stream);
    let performance = &state.config.performance;
    let timeout = Duration::from_secs(performance.read_timeout.max(performance.write_timeout));

    let mut builder = http1::Builder::new();
    builder.keep_alive(performance.keep_alive_timeout > 0);

    let service_state = Arc::clone(&state);
    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
    );

    match tokio::time::timeout(timeout, conn).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => logger::log_warning(&format!(
            "Connection from {peer_addr} timed out after {} seconds",
            timeout.as_secs()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_released_on_drop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let first = reserve_slot(&counter, Some(2)).unwrap();
        let second = reserve_slot(&counter, Some(2)).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        assert!(reserve_slot(&counter, Some(2)).is_none());
        assert_eq!(counter.load(Ordering::SeqCst), 2);

        drop(first);
        drop(second);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unlimited() {
        let counter = Arc::new(AtomicUsize::new(0));
        let slots: Vec<_> = (0..100).map(|_| reserve_slot(&counter, None)).collect();
        assert!(slots.iter().all(Option::is_some));
    }
}

// Server loop module
// Accepts connections until shutdown is signalled, then drains in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop on the current `LocalSet`
///
/// Returns once `shutdown` is notified and in-flight connections have
/// finished, or the drain deadline (`performance.write_timeout`) passed.
pub async fn run_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                tracing::info!(addr = %listener.local_addr()?, "shutdown requested, no longer accepting");
                break;
            }
        }
    }

    drop(listener);
    let deadline = Duration::from_secs(state.config.performance.write_timeout);
    drain(&active_connections, deadline).await;
    Ok(())
}

/// Wait for active connections to reach zero, up to `deadline`
async fn drain(active_connections: &AtomicUsize, deadline: Duration) {
    let waited = tokio::time::timeout(deadline, async {
        while active_connections.load(Ordering::SeqCst) > 0 {
            tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
        }
    })
    .await;

    match waited {
        Ok(()) => tracing::info!("all connections drained"),
        Err(_) => logger::log_warning(&format!(
            "Drain deadline reached with {} connection(s) still open",
            active_connections.load(Ordering::SeqCst)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_cache::testing::FakeOrigin;
    use crate::config::Config;
    use crate::contact::testing::FakeRelay;
    use crate::server::create_reusable_listener;

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let mut config = Config::test_default();
        config.logging.access_log = false;
        config.performance.write_timeout = 1;
        let state = Arc::new(AppState::with_collaborators(
            &config,
            Arc::new(FakeRelay::succeeding()),
            Arc::new(FakeOrigin::default()),
        ));

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(run_server_loop(
                    listener,
                    state,
                    Arc::clone(&shutdown),
                ));

                let client = reqwest::Client::new();
                let response = client
                    .get(format!("http://{addr}/api/test-env"))
                    .send()
                    .await
                    .unwrap();
                assert_eq!(response.status(), 200);
                let body: serde_json::Value = response.json().await.unwrap();
                assert_eq!(body["recipientEmail"], "Not set");
                drop(client);

                shutdown.notify_one();
                server.await.unwrap().unwrap();
            })
            .await;
    }

    #[tokio::test]
    async fn test_drain_returns_at_zero() {
        let counter = AtomicUsize::new(0);
        tokio::time::timeout(Duration::from_millis(500), drain(&counter, Duration::from_secs(5)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_drain_gives_up_at_deadline() {
        let counter = AtomicUsize::new(1);
        drain(&counter, Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}

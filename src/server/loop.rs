// Server loop module
// Accepts connections until shutdown is requested, then drains

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept loop for the application server
///
/// Runs until `state.shutdown` is notified. Open connections are then told
/// to close once their in-flight request is answered, and get up to the
/// connection timeout to do so.
pub async fn run(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = Arc::clone(&state.shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting before waiting on in-flight connections
    drop(listener);
    logger::log_shutdown_started(active_connections.load(Ordering::SeqCst));
    state.close_connections();

    let remaining = drain(&active_connections, state.config.connection_timeout()).await;
    logger::log_shutdown_complete(remaining);
    Ok(())
}

/// Wait until no connection is active or `timeout` elapses.
///
/// Returns the number of connections still active.
async fn drain(active_connections: &AtomicUsize, timeout: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 || tokio::time::Instant::now() >= deadline {
            return active;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_drain_returns_when_idle() {
        let counter = AtomicUsize::new(0);
        assert_eq!(drain(&counter, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test]
    async fn test_drain_gives_up_after_timeout() {
        let counter = AtomicUsize::new(2);
        assert_eq!(drain(&counter, Duration::from_millis(120)).await, 2);
    }

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let mut config = Config::load_from("does-not-exist/config").unwrap();
        config.logging.access_log = false;
        let state = Arc::new(AppState::new(config, crate::api::routes().unwrap()));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(run(listener, Arc::clone(&state)));

        let mut client = TcpStream::connect(addr).await.unwrap();
        client
            .write_all(b"POST /campaign/ HTTP/1.1\r\nHost: localhost\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        client.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 405 Method Not Allowed"));
        assert!(raw.ends_with("405 Method Not Allowed"));

        state.shutdown.notify_one();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_idle_keep_alive_client_does_not_delay_shutdown() {
        let mut config = Config::load_from("does-not-exist/config").unwrap();
        config.logging.access_log = false;
        config.performance.read_timeout = 30;
        config.performance.write_timeout = 30;
        let state = Arc::new(AppState::new(config, crate::api::routes().unwrap()));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(run(listener, Arc::clone(&state)));

        // One answered request, then the connection sits idle
        let mut client = TcpStream::connect(addr).await.unwrap();
        client
            .write_all(b"GET /test/ HTTP/1.1\r\nHost: localhost\r\n\r\n")
            .await
            .unwrap();
        let mut received = Vec::new();
        let mut buf = [0u8; 1024];
        while !received.ends_with(b"test") {
            let n = client.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before the response was complete");
            received.extend_from_slice(&buf[..n]);
        }
        assert!(received.starts_with(b"HTTP/1.1 200 OK"));

        let started = std::time::Instant::now();
        state.shutdown.notify_one();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("shutdown waited on an idle keep-alive connection")
            .unwrap()
            .unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));

        // The server closed the idle connection instead of abandoning it
        let n = tokio::time::timeout(Duration::from_secs(1), client.read(&mut buf))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(n, 0);
    }
}

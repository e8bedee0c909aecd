//! Loopback line server
//!
//! A [`LineServer`] listens on an OS-assigned port of `127.0.0.1`, accepts any
//! number of clients and records every newline-terminated line they send.
//! Tests query the recorded lines or wait for a line count to be reached.

mod acceptor;
mod reader;

use crate::config::ServerConfig;
use crate::core::framing::LineFramer;
use crate::core::line_log::LineLog;
use acceptor::Acceptor;
use parking_lot::RwLock;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

/// Line server error types
#[derive(Error, Debug)]
pub enum ServerError {
    /// The loopback listener could not be created
    #[error("Failed to bind loopback listener: {0}")]
    Bind(#[source] std::io::Error),

    /// The runtime backing a blocking server could not be built
    #[error("Failed to start server runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// Not enough lines arrived before the deadline
    #[error("Expected {requested} lines but only received {actual}")]
    Timeout {
        /// Line count waited for
        requested: usize,
        /// Line count observed when the deadline passed
        actual: usize,
    },
}

/// Server statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStats {
    /// Connections accepted
    pub connections_accepted: u64,
    /// Connections whose reader has finished
    pub connections_closed: u64,
    /// Connections ended by a read or framing error
    pub read_errors: u64,
    /// Lines recorded
    pub lines_received: u64,
}

impl ServerStats {
    /// Connections still being read
    pub fn active_connections(&self) -> u64 {
        self.connections_accepted.saturating_sub(self.connections_closed)
    }
}

/// State shared by the acceptor and every connection reader
#[derive(Clone)]
struct Shared {
    log: LineLog,
    stats: Arc<RwLock<ServerStats>>,
    framer: LineFramer,
}

/// TCP server recording newline-delimited lines from its clients.
///
/// Must be created inside a tokio runtime. Call [`LineServer::close`] once
/// every client has disconnected; dropping the server only stops accepting.
pub struct LineServer {
    local_addr: SocketAddr,
    config: ServerConfig,
    shared: Shared,
    readers: TaskTracker,
    shutdown: CancellationToken,
    acceptor: Option<JoinHandle<()>>,
}

impl LineServer {
    /// Bind a new server with default settings
    pub async fn bind() -> Result<Self, ServerError> {
        Self::bind_with_config(ServerConfig::default()).await
    }

    /// Bind a new server with the given settings
    pub async fn bind_with_config(config: ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .map_err(ServerError::Bind)?;
        let local_addr = listener.local_addr().map_err(ServerError::Bind)?;

        let shared = Shared {
            log: LineLog::new(),
            stats: Arc::new(RwLock::new(ServerStats::default())),
            framer: LineFramer::new()
                .max_length(config.max_line_length)
                .strip_carriage_return(config.strip_carriage_return),
        };
        let readers = TaskTracker::new();
        let shutdown = CancellationToken::new();

        let acceptor = Acceptor::new(listener, shared.clone(), readers.clone(), shutdown.clone());
        let acceptor = tokio::spawn(acceptor.run());

        info!(address = %local_addr, "Line server listening");

        Ok(Self {
            local_addr,
            config,
            shared,
            readers,
            shutdown,
            acceptor: Some(acceptor),
        })
    }

    /// Get the `host:port` string clients should connect to
    pub fn address(&self) -> String {
        self.local_addr.to_string()
    }

    /// Get the bound socket address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Check if any received line contains `expect`
    pub fn received(&self, expect: &str) -> bool {
        self.shared.log.contains(expect)
    }

    /// Check if a received line (without its terminator) equals `expect`
    pub fn received_line(&self, expect: &str) -> bool {
        self.shared.log.contains_line(expect)
    }

    /// Get all received lines in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.shared.log.snapshot()
    }

    /// Get the number of received lines
    pub fn line_count(&self) -> usize {
        self.shared.log.len()
    }

    /// Get connection statistics
    pub fn stats(&self) -> ServerStats {
        let mut stats = *self.shared.stats.read();
        stats.lines_received = self.shared.log.len() as u64;
        stats
    }

    /// Wait until at least `count` lines have been received.
    ///
    /// Returns immediately if the count is already reached. Connection readers
    /// keep running after a timeout.
    pub async fn wait_for_lines(&self, count: usize, timeout: Duration) -> Result<(), ServerError> {
        if self.shared.log.len() >= count {
            return Ok(());
        }

        let poll = async {
            while self.shared.log.len() < count {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        };

        if tokio::time::timeout(timeout, poll).await.is_ok() {
            return Ok(());
        }

        let actual = self.shared.log.len();
        if actual >= count {
            Ok(())
        } else {
            Err(ServerError::Timeout {
                requested: count,
                actual,
            })
        }
    }

    /// Wait for every client to close its connection, then stop listening.
    ///
    /// Never returns while a client keeps its connection open.
    pub async fn close(mut self) {
        debug!(
            active = self.readers.len(),
            "Waiting for client connections to close"
        );
        self.readers.close();
        self.readers.wait().await;

        self.shutdown.cancel();
        if let Some(acceptor) = self.acceptor.take() {
            if let Err(e) = acceptor.await {
                debug!(error = %e, "Acceptor task did not finish cleanly");
            }
        }

        info!(address = %self.local_addr, "Line server closed");
    }
}

impl Drop for LineServer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

impl std::fmt::Debug for LineServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineServer")
            .field("local_addr", &self.local_addr)
            .field("lines", &self.shared.log.len())
            .field("active_connections", &self.readers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_connections() {
        let stats = ServerStats {
            connections_accepted: 5,
            connections_closed: 3,
            read_errors: 1,
            lines_received: 10,
        };
        assert_eq!(stats.active_connections(), 2);
        assert_eq!(ServerStats::default().active_connections(), 0);
    }

    #[test]
    fn test_timeout_message() {
        let err = ServerError::Timeout {
            requested: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "Expected 3 lines but only received 2");
    }

    #[test]
    fn test_runtime_error_message() {
        let err = ServerError::Runtime(std::io::Error::other("no threads"));
        assert_eq!(err.to_string(), "Failed to start server runtime: no threads");
    }

    #[tokio::test]
    async fn test_binds_to_loopback() {
        let server = LineServer::bind().await.unwrap();

        assert!(server.local_addr().ip().is_loopback());
        assert_ne!(server.local_addr().port(), 0);
        assert_eq!(server.address(), server.local_addr().to_string());

        server.close().await;
    }

    #[tokio::test]
    async fn test_wait_for_zero_lines_returns_immediately() {
        let server = LineServer::bind().await.unwrap();

        tokio_test::assert_ok!(server.wait_for_lines(0, Duration::ZERO).await);

        server.close().await;
    }
}

//! Blocking facade over [`LineServer`]
//!
//! For plain `#[test]` functions without an async runtime. The server runs on
//! a private multi-thread runtime so connections are served while the test
//! thread does blocking I/O. Do not use from inside an async context.

use crate::config::ServerConfig;
use crate::core::server::{LineServer, ServerError, ServerStats};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

const WORKER_THREADS: usize = 2;

/// Line server driven from synchronous code
pub struct BlockingServer {
    // Declared before `runtime` so the server is dropped first
    inner: LineServer,
    runtime: Runtime,
}

impl BlockingServer {
    /// Bind a new server with default settings
    pub fn bind() -> Result<Self, ServerError> {
        Self::bind_with_config(ServerConfig::default())
    }

    /// Bind a new server with the given settings
    pub fn bind_with_config(config: ServerConfig) -> Result<Self, ServerError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name("tcpfixture")
            .enable_all()
            .build()
            .map_err(ServerError::Runtime)?;

        let inner = runtime.block_on(LineServer::bind_with_config(config))?;

        Ok(Self { inner, runtime })
    }

    /// Get the `host:port` string clients should connect to
    pub fn address(&self) -> String {
        self.inner.address()
    }

    /// Get the bound socket address
    pub fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr()
    }

    /// Check if any received line contains `expect`
    pub fn received(&self, expect: &str) -> bool {
        self.inner.received(expect)
    }

    /// Check if a received line equals `expect`
    pub fn received_line(&self, expect: &str) -> bool {
        self.inner.received_line(expect)
    }

    /// Get all received lines in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.inner.lines()
    }

    /// Get the number of received lines
    pub fn line_count(&self) -> usize {
        self.inner.line_count()
    }

    /// Get connection statistics
    pub fn stats(&self) -> ServerStats {
        self.inner.stats()
    }

    /// Block until at least `count` lines have been received
    pub fn wait_for_lines(&self, count: usize, timeout: Duration) -> Result<(), ServerError> {
        self.runtime.block_on(self.inner.wait_for_lines(count, timeout))
    }

    /// Block until every client has disconnected, then stop listening
    pub fn close(self) {
        let Self { inner, runtime } = self;
        runtime.block_on(inner.close());
    }
}

impl std::fmt::Debug for BlockingServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("BlockingServer").field(&self.inner).finish()
    }
}

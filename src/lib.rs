//! # Tcpfixture
//!
//! An in-process TCP server for end-to-end tests of code that writes
//! newline-delimited text over TCP:
//! - Listens on an OS-assigned port of the loopback interface
//! - Accepts any number of concurrent clients
//! - Records every complete line, in arrival order
//! - Lets tests query the lines or wait for a line count without fixed sleeps
//!
//! Unterminated trailing bytes are never recorded.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use tcpfixture::LineServer;
//! use tokio::io::AsyncWriteExt;
//! use tokio::net::TcpStream;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let server = LineServer::bind().await?;
//!
//!     let mut conn = TcpStream::connect(server.address()).await?;
//!     conn.write_all(b"hello\nworld!\n").await?;
//!     drop(conn);
//!
//!     server.wait_for_lines(2, Duration::from_secs(1)).await?;
//!     assert!(server.received_line("hello"));
//!     assert!(server.received("world"));
//!
//!     server.close().await;
//!     Ok(())
//! }
//! ```
//!
//! Synchronous tests use [`blocking::BlockingServer`] instead.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blocking;
pub mod config;
pub mod core;
pub mod utils;

// Re-exports for convenience
pub use crate::blocking::BlockingServer;
pub use crate::config::ServerConfig;
pub use crate::core::framing::{FramingError, LineFramer};
pub use crate::core::line_log::LineLog;
pub use crate::core::server::{LineServer, ServerError, ServerStats};
pub use crate::utils::logging::init_tracing;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Core module containing the line server
//!
//! This module provides:
//! - Newline framing of connection byte streams
//! - The shared, append-only line log
//! - The loopback server with its accept loop and per-connection readers

pub mod framing;
pub mod line_log;
pub mod server;

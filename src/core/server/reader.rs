//! Per-connection line reader

use super::Shared;
use futures::StreamExt;
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio_util::codec::FramedRead;
use tracing::{debug, trace};

/// Reads one client connection and records its complete lines
pub(super) struct LineReader {
    stream: TcpStream,
    peer: SocketAddr,
    shared: Shared,
}

impl LineReader {
    pub(super) fn new(stream: TcpStream, peer: SocketAddr, shared: Shared) -> Self {
        Self {
            stream,
            peer,
            shared,
        }
    }

    /// Read until end of stream or the first error.
    ///
    /// Errors end the connection quietly; they are only counted.
    pub(super) async fn run(self) {
        let Self {
            stream,
            peer,
            shared,
        } = self;
        let mut frames = FramedRead::new(stream, shared.framer.clone());

        while let Some(frame) = frames.next().await {
            match frame {
                Ok(line) => {
                    trace!(%peer, %line, "Line received");
                    shared.log.push(line);
                }
                Err(e) => {
                    debug!(%peer, error = %e, "Connection read failed");
                    shared.stats.write().read_errors += 1;
                    break;
                }
            }
        }

        shared.stats.write().connections_closed += 1;
        debug!(%peer, "Connection closed");
    }
}

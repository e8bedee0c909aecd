//! Accept loop

use super::reader::LineReader;
use super::Shared;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

/// Owns the listener and hands each connection to its own reader task
pub(super) struct Acceptor {
    listener: TcpListener,
    shared: Shared,
    readers: TaskTracker,
    shutdown: CancellationToken,
}

impl Acceptor {
    pub(super) fn new(
        listener: TcpListener,
        shared: Shared,
        readers: TaskTracker,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            listener,
            shared,
            readers,
            shutdown,
        }
    }

    /// Accept until shutdown or the first accept failure.
    ///
    /// The listener is released when this returns.
    pub(super) async fn run(self) {
        loop {
            let accepted = tokio::select! {
                () = self.shutdown.cancelled() => {
                    debug!("Acceptor shutting down");
                    break;
                }
                accepted = self.listener.accept() => accepted,
            };

            match accepted {
                Ok((stream, peer)) => {
                    self.shared.stats.write().connections_accepted += 1;
                    debug!(%peer, "Accepted connection");

                    let reader = LineReader::new(stream, peer, self.shared.clone());
                    self.readers.spawn(reader.run());
                }
                Err(e) => {
                    debug!(error = %e, "Accept failed, acceptor exiting");
                    break;
                }
            }
        }
    }
}

//! Daemon command channel and OS signal handling

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::domain::history::EntryId;

/// Reply slot for a daemon command: `Ok(detail)` or `Err(message)`
pub type Reply = oneshot::Sender<Result<String, String>>;

/// Commands processed by the daemon loop, one at a time
#[derive(Debug)]
pub enum DaemonCommand {
    /// Copy an entry back to the clipboard and promote it
    Use {
        id: EntryId,
        target: Option<String>,
        reply: Reply,
    },
    /// Delete one entry
    Delete { id: EntryId, reply: Reply },
    /// Delete everything
    Clear { reply: Reply },
    /// Run the retention sweep now
    Sweep { reply: Reply },
    /// Shutdown daemon (IPC stop, SIGINT, SIGTERM)
    Shutdown,
}

impl DaemonCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Use { .. } => "use",
            Self::Delete { .. } => "delete",
            Self::Clear { .. } => "clear",
            Self::Sweep { .. } => "sweep",
            Self::Shutdown => "shutdown",
        }
    }
}

/// Daemon command receiver
///
/// Handles OS shutdown signals (SIGINT/SIGTERM) and provides a channel
/// for receiving commands from other sources (e.g., the IPC server).
pub struct DaemonSignalHandler {
    receiver: mpsc::Receiver<DaemonCommand>,
}

impl DaemonSignalHandler {
    /// Create a new handler and start listening for shutdown signals.
    ///
    /// Returns the handler and a sender for other command sources.
    pub async fn new() -> Result<(Self, mpsc::Sender<DaemonCommand>), std::io::Error> {
        let (tx, rx) = mpsc::channel(32);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            sigint.recv().await;
            info!("Received SIGINT (shutdown)");
            let _ = tx_int.send(DaemonCommand::Shutdown).await;
        });

        let tx_term = tx.clone();
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            sigterm.recv().await;
            info!("Received SIGTERM (shutdown)");
            let _ = tx_term.send(DaemonCommand::Shutdown).await;
        });

        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next command
    pub async fn recv(&mut self) -> Option<DaemonCommand> {
        self.receiver.recv().await
    }
}

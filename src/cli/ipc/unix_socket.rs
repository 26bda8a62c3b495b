//! Unix Domain Socket communication for daemon control

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};

use super::{reply_line, IpcClient, IpcRequest, IpcServer};
use crate::cli::signals::{DaemonCommand, Reply};
use crate::domain::history::Entry;

const SOCKET_NAME: &str = "clipmenu.sock";

/// Socket path resolver
#[derive(Debug, Clone)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    /// Create socket path, preferring XDG_RUNTIME_DIR
    pub fn new() -> Self {
        let path = std::env::var("XDG_RUNTIME_DIR")
            .map(|dir| PathBuf::from(dir).join(SOCKET_NAME))
            .unwrap_or_else(|_| std::env::temp_dir().join(SOCKET_NAME));
        Self { path }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the socket path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if socket file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove socket file if it exists
    pub fn cleanup(&self) -> io::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SocketPath {
    fn default() -> Self {
        Self::new()
    }
}

/// Unix Domain Socket server for daemon commands
pub struct UnixSocketServer {
    socket_path: SocketPath,
    listener: Option<UnixListener>,
}

impl UnixSocketServer {
    /// Create a new socket server
    pub fn new(socket_path: SocketPath) -> Self {
        Self {
            socket_path,
            listener: None,
        }
    }
}

impl Drop for UnixSocketServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

#[async_trait]
impl IpcServer for UnixSocketServer {
    fn bind(&mut self) -> io::Result<()> {
        // Remove stale socket file if it exists
        self.socket_path.cleanup()?;

        let listener = UnixListener::bind(self.socket_path.path())?;
        self.listener = Some(listener);
        Ok(())
    }

    fn path(&self) -> String {
        self.socket_path.path().to_string_lossy().to_string()
    }

    async fn run(
        &self,
        tx: mpsc::Sender<DaemonCommand>,
        snapshot: watch::Receiver<Vec<Entry>>,
    ) -> io::Result<()> {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Socket not bound"))?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let tx = tx.clone();
                    let snapshot = snapshot.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, tx, snapshot).await {
                            debug!(error = %e, "Socket connection error");
                        }
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Socket accept error");
                }
            }
        }
    }

    fn cleanup(&self) {
        let _ = self.socket_path.cleanup();
    }
}

/// Forward a command to the daemon loop and wait for its reply
async fn dispatch(
    tx: &mpsc::Sender<DaemonCommand>,
    build: impl FnOnce(Reply) -> DaemonCommand,
) -> String {
    let (reply, response) = oneshot::channel();
    if tx.send(build(reply)).await.is_err() {
        return reply_line(Err("daemon is shutting down".to_string()));
    }
    match response.await {
        Ok(result) => reply_line(result),
        Err(_) => reply_line(Err("daemon dropped the request".to_string())),
    }
}

/// Answer one request
async fn respond(
    request: IpcRequest,
    tx: &mpsc::Sender<DaemonCommand>,
    snapshot: &watch::Receiver<Vec<Entry>>,
) -> String {
    match request {
        IpcRequest::List => {
            let entries = snapshot.borrow().clone();
            serde_json::to_string(&entries)
                .unwrap_or_else(|e| reply_line(Err(format!("failed to encode history: {}", e))))
        }
        IpcRequest::Status => format!(
            "running pid={} entries={}",
            std::process::id(),
            snapshot.borrow().len()
        ),
        IpcRequest::Use { id, target } => {
            dispatch(tx, |reply| DaemonCommand::Use { id, target, reply }).await
        }
        IpcRequest::Delete { id } => dispatch(tx, |reply| DaemonCommand::Delete { id, reply }).await,
        IpcRequest::Clear => dispatch(tx, |reply| DaemonCommand::Clear { reply }).await,
        IpcRequest::Sweep => dispatch(tx, |reply| DaemonCommand::Sweep { reply }).await,
        IpcRequest::Stop => {
            let _ = tx.send(DaemonCommand::Shutdown).await;
            reply_line(Ok(String::new()))
        }
    }
}

/// Handle a single client connection
async fn handle_connection(
    stream: UnixStream,
    tx: mpsc::Sender<DaemonCommand>,
    snapshot: watch::Receiver<Vec<Entry>>,
) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    reader.read_line(&mut line).await?;

    let response = match IpcRequest::parse(&line) {
        Ok(request) => {
            debug!(request = %request.to_line(), "IPC request");
            respond(request, &tx, &snapshot).await
        }
        Err(message) => reply_line(Err(message)),
    };

    writer.write_all(response.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;

    Ok(())
}

/// Unix Domain Socket client for sending commands to daemon
pub struct UnixSocketClient {
    socket_path: SocketPath,
}

impl UnixSocketClient {
    /// Create a new socket client
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }
}

#[async_trait]
impl IpcClient for UnixSocketClient {
    fn is_daemon_running(&self) -> bool {
        self.socket_path.exists()
    }

    async fn send(&self, request: &IpcRequest) -> io::Result<String> {
        let stream = UnixStream::connect(self.socket_path.path()).await?;
        let (reader, mut writer) = stream.into_split();

        writer
            .write_all(format!("{}\n", request.to_line()).as_bytes())
            .await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut response = String::new();
        reader.read_line(&mut response).await?;

        Ok(response)
    }
}

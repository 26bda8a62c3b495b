//! IPC (Inter-Process Communication) module for daemon control
//!
//! One request line per connection, one response line back:
//!
//! | request              | response                           |
//! |----------------------|------------------------------------|
//! | `list`               | JSON array of entries              |
//! | `use <id> [target]`  | `ok <new id>` or `error: ...`      |
//! | `delete <id>`        | `ok` or `error: ...`               |
//! | `clear`              | `ok removed=N`                     |
//! | `sweep`              | `ok expired=N missing=K orphans=M` |
//! | `status`             | `running pid=P entries=N`          |
//! | `stop`               | `ok`                               |

mod unix_socket;

pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::io;

use tokio::sync::{mpsc, watch};

use super::signals::DaemonCommand;
use crate::domain::history::{Entry, EntryId};

/// A parsed client request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpcRequest {
    List,
    Use { id: EntryId, target: Option<String> },
    Delete { id: EntryId },
    Clear,
    Sweep,
    Status,
    Stop,
}

impl IpcRequest {
    /// Parse a request line
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let parse_id = |s: &str| -> Result<EntryId, String> {
            if s.is_empty() {
                return Err(format!("{} requires an entry id", verb));
            }
            s.parse::<EntryId>().map_err(|e| e.to_string())
        };

        let no_args = |request: Self| -> Result<Self, String> {
            if rest.is_empty() {
                Ok(request)
            } else {
                Err(format!("{} takes no arguments", verb))
            }
        };

        match verb {
            "list" => no_args(Self::List),
            "use" => {
                let (id, target) = match rest.split_once(char::is_whitespace) {
                    Some((id, target)) => (id, Some(target.trim().to_string())),
                    None => (rest, None),
                };
                Ok(Self::Use {
                    id: parse_id(id)?,
                    target: target.filter(|t| !t.is_empty()),
                })
            }
            "delete" => Ok(Self::Delete {
                id: parse_id(rest)?,
            }),
            "clear" => no_args(Self::Clear),
            "sweep" => no_args(Self::Sweep),
            "status" => no_args(Self::Status),
            "stop" => no_args(Self::Stop),
            "" => Err("empty request".to_string()),
            other => Err(format!("unknown command '{}'", other)),
        }
    }

    /// Serialize as a request line (without newline)
    pub fn to_line(&self) -> String {
        match self {
            Self::List => "list".to_string(),
            Self::Use { id, target: None } => format!("use {}", id),
            Self::Use {
                id,
                target: Some(target),
            } => format!("use {} {}", id, target),
            Self::Delete { id } => format!("delete {}", id),
            Self::Clear => "clear".to_string(),
            Self::Sweep => "sweep".to_string(),
            Self::Status => "status".to_string(),
            Self::Stop => "stop".to_string(),
        }
    }
}

/// Render a command reply as a response line
pub fn reply_line(reply: Result<String, String>) -> String {
    match reply {
        Ok(detail) if detail.is_empty() => "ok".to_string(),
        Ok(detail) => format!("ok {}", detail),
        Err(message) => format!("error: {}", message),
    }
}

/// Interpret a response line: `error: ...` becomes `Err`, anything else
/// is returned with a leading `ok` stripped.
pub fn parse_response(line: &str) -> Result<String, String> {
    let line = line.trim();
    if let Some(message) = line.strip_prefix("error:") {
        return Err(message.trim().to_string());
    }
    if line == "ok" {
        return Ok(String::new());
    }
    Ok(line.strip_prefix("ok ").unwrap_or(line).to_string())
}

/// Trait for IPC servers that listen for daemon commands
#[async_trait::async_trait]
pub trait IpcServer: Send + Sync {
    /// Bind to the IPC endpoint
    fn bind(&mut self) -> io::Result<()>;

    /// Get the path/name of the IPC endpoint
    fn path(&self) -> String;

    /// Accept and handle connections.
    ///
    /// Mutating requests are forwarded to `tx`; `list` and `status` are
    /// answered from the latest published snapshot.
    async fn run(
        &self,
        tx: mpsc::Sender<DaemonCommand>,
        snapshot: watch::Receiver<Vec<Entry>>,
    ) -> io::Result<()>;

    /// Cleanup IPC resources
    fn cleanup(&self);
}

/// Trait for IPC clients that send commands to the daemon
#[async_trait::async_trait]
pub trait IpcClient: Send + Sync {
    /// Check if daemon appears to be running (endpoint exists)
    fn is_daemon_running(&self) -> bool;

    /// Send a request and receive the raw response line
    async fn send(&self, request: &IpcRequest) -> io::Result<String>;
}

/// Create the IPC server
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(UnixSocketServer::new(SocketPath::new()))
}

/// Create the IPC client
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(UnixSocketClient::new(SocketPath::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_verbs() {
        assert_eq!(IpcRequest::parse("list\n"), Ok(IpcRequest::List));
        assert_eq!(IpcRequest::parse("  clear "), Ok(IpcRequest::Clear));
        assert_eq!(IpcRequest::parse("status"), Ok(IpcRequest::Status));
        assert_eq!(IpcRequest::parse("stop"), Ok(IpcRequest::Stop));
    }

    #[test]
    fn parses_use_with_multiword_target() {
        assert_eq!(
            IpcRequest::parse("use 42 Visual Studio Code"),
            Ok(IpcRequest::Use {
                id: EntryId::new(42),
                target: Some("Visual Studio Code".to_string()),
            })
        );
        assert_eq!(
            IpcRequest::parse("use 42"),
            Ok(IpcRequest::Use {
                id: EntryId::new(42),
                target: None,
            })
        );
    }

    #[test]
    fn rejects_bad_requests() {
        assert!(IpcRequest::parse("").is_err());
        assert!(IpcRequest::parse("toggle").is_err());
        assert!(IpcRequest::parse("delete").is_err());
        assert!(IpcRequest::parse("delete x1").is_err());
        assert!(IpcRequest::parse("clear now").is_err());
    }

    #[test]
    fn request_lines_parse_back() {
        let requests = [
            IpcRequest::Use {
                id: EntryId::new(9),
                target: Some("Terminal".to_string()),
            },
            IpcRequest::Delete { id: EntryId::new(3) },
            IpcRequest::Sweep,
        ];
        for request in requests {
            assert_eq!(IpcRequest::parse(&request.to_line()), Ok(request));
        }
    }

    #[test]
    fn reply_and_response_agree() {
        assert_eq!(parse_response(&reply_line(Ok(String::new()))), Ok(String::new()));
        assert_eq!(
            parse_response(&reply_line(Ok("removed=3".to_string()))),
            Ok("removed=3".to_string())
        );
        assert_eq!(
            parse_response(&reply_line(Err("no entry with id 5".to_string()))),
            Err("no entry with id 5".to_string())
        );
        assert_eq!(parse_response("[]\n"), Ok("[]".to_string()));
    }
}

//! Daemon command handler - sends commands to running daemon via IPC

use super::args::DaemonAction;
use super::ipc::{create_ipc_client, parse_response, IpcClient, IpcRequest};
use super::presenter::Presenter;

/// Connect to the daemon, send `request`, and interpret the response
pub async fn request(client: &dyn IpcClient, request: &IpcRequest) -> Result<String, String> {
    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: clipmenu --daemon".to_string());
    }

    let response = client
        .send(request)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;

    parse_response(&response)
}

/// Handle daemon subcommand
pub async fn handle_daemon_command(
    action: DaemonAction,
    presenter: &Presenter,
) -> Result<(), String> {
    let client = create_ipc_client();

    match action {
        DaemonAction::Status => {
            let status = request(client.as_ref(), &IpcRequest::Status).await?;
            presenter.info(&format!("Daemon status: {}", status));
        }
        DaemonAction::Stop => {
            request(client.as_ref(), &IpcRequest::Stop).await?;
            presenter.info("Stop requested");
        }
    }

    Ok(())
}

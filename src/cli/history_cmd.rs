//! History commands - list, use, delete, clear and sweep through the daemon

use chrono::Utc;

use crate::domain::history::search;
use crate::domain::history::{Entry, EntryId};

use super::args::ListArgs;
use super::daemon_cmd::request;
use super::ipc::{create_ipc_client, IpcRequest};
use super::presenter::Presenter;

/// Apply the `list` query and limit to a snapshot
pub fn select<'a>(entries: &'a [Entry], args: &ListArgs) -> Vec<&'a Entry> {
    let mut matches = search::filter(entries, args.query.as_deref().unwrap_or(""));
    if let Some(limit) = args.limit {
        matches.truncate(limit);
    }
    matches
}

/// Print the history, newest first
pub async fn handle_list(args: ListArgs, presenter: &Presenter) -> Result<(), String> {
    let client = create_ipc_client();
    let payload = request(client.as_ref(), &IpcRequest::List).await?;

    let entries: Vec<Entry> = serde_json::from_str(&payload)
        .map_err(|e| format!("Unexpected response from daemon: {}", e))?;
    let selected = select(&entries, &args);

    if args.json {
        let json = serde_json::to_string_pretty(&selected)
            .map_err(|e| format!("Failed to encode entries: {}", e))?;
        presenter.output(&json);
        return Ok(());
    }

    if selected.is_empty() {
        presenter.info("History is empty");
        return Ok(());
    }

    let now = Utc::now();
    for entry in selected {
        presenter.entry_line(entry, now);
    }
    Ok(())
}

/// Copy an entry back to the clipboard
pub async fn handle_use(
    id: EntryId,
    target: Option<String>,
    presenter: &Presenter,
) -> Result<(), String> {
    let client = create_ipc_client();
    let new_id = request(client.as_ref(), &IpcRequest::Use { id, target }).await?;
    presenter.success(&format!("Copied entry {} to clipboard (now {})", id, new_id));
    Ok(())
}

/// Delete one entry
pub async fn handle_delete(id: EntryId, presenter: &Presenter) -> Result<(), String> {
    let client = create_ipc_client();
    request(client.as_ref(), &IpcRequest::Delete { id }).await?;
    presenter.success(&format!("Deleted entry {}", id));
    Ok(())
}

/// Delete everything
pub async fn handle_clear(presenter: &Presenter) -> Result<(), String> {
    let client = create_ipc_client();
    let detail = request(client.as_ref(), &IpcRequest::Clear).await?;
    presenter.success(&format!("History cleared ({})", detail));
    Ok(())
}

/// Run the retention sweep now
pub async fn handle_sweep(presenter: &Presenter) -> Result<(), String> {
    let client = create_ipc_client();
    let detail = request(client.as_ref(), &IpcRequest::Sweep).await?;
    presenter.success(&format!("Sweep finished ({})", detail));
    Ok(())
}

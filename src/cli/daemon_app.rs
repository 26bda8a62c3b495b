//! Daemon app runner
//!
//! One `select!` loop owns every mutation: poll ticks, sweep ticks, IPC
//! commands and shutdown signals are handled strictly one after another.

use std::process::ExitCode;

use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::application::ports::{BlobStore, Clipboard, HistoryObserver, HistoryStore, Paster};
use crate::application::{ClipboardHistoryUseCase, HistoryConfig, HistoryError, IngestOutcome};
use crate::infrastructure::{
    create_clipboard, create_paster, ClipboardTool, FsBlobStore, JsonHistoryStore, NoOpPaster,
    PasteToolPreference, WatchObserver,
};

use super::app::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
use super::args::DaemonOptions;
use super::ipc::create_ipc_server;
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals::{DaemonCommand, DaemonSignalHandler};

/// Run daemon mode
pub async fn run_daemon(options: DaemonOptions) -> ExitCode {
    let presenter = Presenter::new();

    let clipboard_tool = match options.clipboard_tool.parse::<ClipboardTool>() {
        Ok(tool) => tool,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };
    let paste_preference = match options.paste_tool.parse::<PasteToolPreference>() {
        Ok(pref) => pref,
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    // Acquire PID file
    let pid_file = PidFile::new();
    if let Err(e) = pid_file.acquire() {
        match e {
            PidFileError::AlreadyRunning(pid) => {
                presenter.error(&format!("Another daemon is already running (PID: {})", pid));
            }
            _ => presenter.error(&e.to_string()),
        }
        return ExitCode::from(EXIT_ERROR);
    }

    // Paste tool problems only matter when autopaste is on
    let paster: Box<dyn Paster> = if options.autopaste {
        match create_paster(paste_preference).await {
            Ok((paster, tool)) => {
                info!(tool = %tool, "Autopaste enabled");
                paster
            }
            Err(e) => {
                presenter.warn(&format!("Autopaste disabled: {}", e));
                Box::new(NoOpPaster::new())
            }
        }
    } else {
        Box::new(NoOpPaster::new())
    };

    let (observer, snapshot) = WatchObserver::channel();
    let use_case = ClipboardHistoryUseCase::new(
        FsBlobStore::new(options.data_dir.join("images")),
        JsonHistoryStore::new(options.data_dir.join("history.json")),
        create_clipboard(clipboard_tool),
        paster,
        observer,
        HistoryConfig {
            history_limit: options.history_limit,
            autopaste: options.autopaste,
            ..Default::default()
        },
    );

    // Setup signal handler (returns handler + sender for the IPC server)
    let (mut signals, command_tx) = match DaemonSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut server = create_ipc_server();
    if let Err(e) = server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }
    let socket = server.path();

    // Restore before serving so the first snapshot is the persisted history
    let restored = use_case.restore().await;
    let report = use_case.sweep(options.retention).await;

    let server_task = tokio::spawn(async move {
        if let Err(e) = server.run(command_tx, snapshot).await {
            warn!(error = %e, "IPC server stopped");
        }
    });

    presenter.daemon_status(&format!(
        "Started with {} entries ({} expired)",
        restored.saturating_sub(report.expired + report.missing_blobs),
        report.expired
    ));
    presenter.info(&format!(
        "PID: {} | Socket: {} | Data: {} | SIGINT: exit",
        std::process::id(),
        socket,
        options.data_dir.display()
    ));

    let clean = daemon_loop(&use_case, &mut signals, &options).await;

    // Dropping the server removes the socket file
    server_task.abort();
    let _ = server_task.await;
    let _ = pid_file.release();

    presenter.daemon_status("Stopped");
    if clean {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

async fn daemon_loop<B, H, C, P, O>(
    use_case: &ClipboardHistoryUseCase<B, H, C, P, O>,
    signals: &mut DaemonSignalHandler,
    options: &DaemonOptions,
) -> bool
where
    B: BlobStore,
    H: HistoryStore,
    C: Clipboard,
    P: Paster + 'static,
    O: HistoryObserver,
{
    let mut poll = interval(options.poll_interval.as_std());
    poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let sweep_period = options.sweep_interval.as_std();
    let mut sweep = interval_at(Instant::now() + sweep_period, sweep_period);
    sweep.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        poll_interval = %options.poll_interval,
        retention = %options.retention,
        sweep_interval = %options.sweep_interval,
        "Watching clipboard"
    );

    loop {
        tokio::select! {
            _ = poll.tick() => poll_once(use_case).await,
            _ = sweep.tick() => {
                use_case.sweep(options.retention).await;
            }
            command = signals.recv() => match command {
                Some(DaemonCommand::Shutdown) => {
                    info!("Shutting down");
                    return true;
                }
                Some(command) => handle_command(use_case, command, options).await,
                None => return false,
            },
        }
    }
}

async fn poll_once<B, H, C, P, O>(use_case: &ClipboardHistoryUseCase<B, H, C, P, O>)
where
    B: BlobStore,
    H: HistoryStore,
    C: Clipboard,
    P: Paster + 'static,
    O: HistoryObserver,
{
    match use_case.poll().await {
        Ok(Some(IngestOutcome::Added(entry))) => {
            info!(id = %entry.id, kind = %entry.kind(), "Captured clipboard entry");
        }
        Ok(_) => {}
        // The clipboard is often briefly unavailable; the next tick retries
        Err(HistoryError::Clipboard(e)) => debug!(error = %e, "Clipboard read failed"),
        Err(e) => warn!(error = %e, "Failed to capture clipboard entry"),
    }
}

async fn handle_command<B, H, C, P, O>(
    use_case: &ClipboardHistoryUseCase<B, H, C, P, O>,
    command: DaemonCommand,
    options: &DaemonOptions,
) where
    B: BlobStore,
    H: HistoryStore,
    C: Clipboard,
    P: Paster + 'static,
    O: HistoryObserver,
{
    debug!(command = command.name(), "Processing command");

    match command {
        DaemonCommand::Use { id, target, reply } => {
            let result = match use_case.use_entry(id, target).await {
                Ok(Some(entry)) => Ok(entry.id.to_string()),
                Ok(None) => Err(format!("no entry with id {}", id)),
                Err(e) => Err(e.to_string()),
            };
            let _ = reply.send(result);
        }
        DaemonCommand::Delete { id, reply } => {
            let result = if use_case.delete(id).await {
                Ok(String::new())
            } else {
                Err(format!("no entry with id {}", id))
            };
            let _ = reply.send(result);
        }
        DaemonCommand::Clear { reply } => {
            let removed = use_case.clear().await;
            let _ = reply.send(Ok(format!("removed={}", removed)));
        }
        DaemonCommand::Sweep { reply } => {
            let report = use_case.sweep(options.retention).await;
            let _ = reply.send(Ok(format!(
                "expired={} missing={} orphans={}",
                report.expired, report.missing_blobs, report.orphans_removed
            )));
        }
        DaemonCommand::Shutdown => {}
    }
}

//! ClipMenu CLI entry point

use std::process::ExitCode;

#[cfg(unix)]
use clap::Parser;

#[cfg(unix)]
use clipmenu::cli::{
    app::{init_logging, load_merged_config, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands, ListArgs},
    config_cmd::handle_config_command,
    daemon_app::run_daemon,
    daemon_cmd::handle_daemon_command,
    history_cmd,
    presenter::Presenter,
    DaemonOptions,
};
#[cfg(unix)]
use clipmenu::domain::config::{AppConfig, LinuxConfig};
#[cfg(unix)]
use clipmenu::domain::time::Duration;
#[cfg(unix)]
use clipmenu::infrastructure::XdgConfigStore;

#[cfg(unix)]
#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    if cli.daemon {
        init_logging("info");
        return start_daemon(cli, &presenter).await;
    }

    init_logging("warn");

    let result = match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            handle_config_command(action, &store, &presenter)
                .await
                .map_err(|e| e.to_string())
        }
        Some(Commands::Daemon { action }) => handle_daemon_command(action, &presenter).await,
        Some(Commands::List(args)) => history_cmd::handle_list(args, &presenter).await,
        None => history_cmd::handle_list(ListArgs::default(), &presenter).await,
        Some(Commands::Use { id, target }) => {
            history_cmd::handle_use(id, target, &presenter).await
        }
        Some(Commands::Delete { id }) => history_cmd::handle_delete(id, &presenter).await,
        Some(Commands::Clear) => history_cmd::handle_clear(&presenter).await,
        Some(Commands::Sweep) => history_cmd::handle_sweep(&presenter).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            presenter.error(&e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Build daemon options from merged config and run the daemon
#[cfg(unix)]
async fn start_daemon(cli: Cli, presenter: &Presenter) -> ExitCode {
    let linux = if cli.paste_tool.is_some() || cli.clipboard_tool.is_some() {
        Some(LinuxConfig {
            paste_tool: cli.paste_tool.clone(),
            clipboard_tool: cli.clipboard_tool.clone(),
        })
    } else {
        None
    };

    let cli_config = AppConfig {
        history_limit: cli.history_limit,
        poll_interval: cli.poll_interval.clone(),
        retention: cli.retention.clone(),
        sweep_interval: None,
        data_dir: cli.data_dir.clone(),
        autopaste: if cli.autopaste { Some(true) } else { None },
        linux,
    };

    let config = load_merged_config(cli_config).await;

    let durations = (
        parse_duration("poll-interval", config.poll_interval.as_deref()),
        parse_duration("retention", config.retention.as_deref()),
        parse_duration("sweep-interval", config.sweep_interval.as_deref()),
    );
    let (poll_interval, retention, sweep_interval) = match durations {
        (Ok(poll), Ok(retention), Ok(sweep)) => (
            poll.unwrap_or_else(Duration::default_poll_interval),
            retention.unwrap_or_else(Duration::default_retention),
            sweep.unwrap_or_else(Duration::default_sweep_interval),
        ),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let options = DaemonOptions {
        poll_interval,
        retention,
        sweep_interval,
        history_limit: config.history_limit_or_default(),
        data_dir: config.data_dir_or_default(),
        autopaste: config.autopaste_or_default(),
        paste_tool: config.paste_tool_or_default().to_string(),
        clipboard_tool: config.clipboard_tool_or_default().to_string(),
    };

    run_daemon(options).await
}

#[cfg(unix)]
fn parse_duration(name: &str, value: Option<&str>) -> Result<Option<Duration>, String> {
    value
        .map(|s| {
            s.parse::<Duration>()
                .map_err(|e| format!("Invalid {}: {}", name, e))
        })
        .transpose()
}

#[cfg(not(unix))]
fn main() -> ExitCode {
    eprintln!("clipmenu needs a Unix platform (Linux or macOS)");
    ExitCode::from(1)
}

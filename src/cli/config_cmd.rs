//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, LinuxConfig};
use crate::domain::error::ConfigError;
use crate::domain::time::Duration;
use crate::infrastructure::{ClipboardTool, PasteToolPreference};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => {
            presenter.output(&store.path().to_string_lossy());
            Ok(())
        }
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(read_value(&config, key).as_deref().unwrap_or(NOT_SET));
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, read_value(&config, key).as_deref().unwrap_or(NOT_SET));
    }
    Ok(())
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "history_limit" => {
            let limit: usize = value
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid("Value must be a positive integer".to_string()))?;
            config.history_limit = Some(limit);
        }
        "poll_interval" | "retention" | "sweep_interval" => {
            let parsed: Duration = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            let normalized = Some(parsed.to_string());
            match key {
                "poll_interval" => config.poll_interval = normalized,
                "retention" => config.retention = normalized,
                _ => config.sweep_interval = normalized,
            }
        }
        "data_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            config.data_dir = Some(value.to_string());
        }
        "autopaste" => {
            config.autopaste = Some(
                parse_bool(value)
                    .map_err(|_| invalid("Value must be 'true' or 'false'".to_string()))?,
            );
        }
        "linux.paste_tool" => {
            let tool: PasteToolPreference =
                value.parse().map_err(|e| invalid(format!("{}", e)))?;
            linux_section(config).paste_tool = Some(tool.to_string());
        }
        "linux.clipboard_tool" => {
            let tool: ClipboardTool = value.parse().map_err(invalid)?;
            linux_section(config).clipboard_tool = Some(tool.to_string());
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

fn linux_section(config: &mut AppConfig) -> &mut LinuxConfig {
    config.linux.get_or_insert_with(LinuxConfig::default)
}

/// Read the stored value for `key`, if set
fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    let linux = config.linux.as_ref();
    match key {
        "history_limit" => config.history_limit.map(|n| n.to_string()),
        "poll_interval" => config.poll_interval.clone(),
        "retention" => config.retention.clone(),
        "sweep_interval" => config.sweep_interval.clone(),
        "data_dir" => config.data_dir.clone(),
        "autopaste" => config.autopaste.map(|b| b.to_string()),
        "linux.paste_tool" => linux.and_then(|l| l.paste_tool.clone()),
        "linux.clipboard_tool" => linux.and_then(|l| l.clipboard_tool.clone()),
        _ => None,
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

//! Configuration for the `chatwin` tool.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/chatwin/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::window::{DEFAULT_FILE_PAGE_SIZE, DEFAULT_MUTE_DURATION, WindowDefaults};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A value parsed but is out of range.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Dotted config key.
        key: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    account: AccountFileConfig,
    window: WindowFileConfig,
    history: HistoryFileConfig,
}

/// `[account]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct AccountFileConfig {
    id: Option<i64>,
}

/// `[window]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct WindowFileConfig {
    default_mute_secs: Option<u64>,
    default_kick_message: Option<String>,
    file_page_size: Option<u32>,
}

/// `[history]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct HistoryFileConfig {
    enabled: Option<bool>,
    path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct ChatwinConfig {
    /// The bot's own account number, recorded as sender of sent messages.
    pub account_id: i64,
    /// Mute length when none is given.
    pub default_mute: Duration,
    /// Kick message when none is given.
    pub default_kick_message: String,
    /// Page size for group file listings without a query.
    pub file_page_size: u32,
    /// Whether sent messages are written to `history_path`.
    pub history_enabled: bool,
    /// JSON lines file for sent messages.
    pub history_path: Option<PathBuf>,
}

impl Default for ChatwinConfig {
    fn default() -> Self {
        Self {
            account_id: 0,
            default_mute: DEFAULT_MUTE_DURATION,
            default_kick_message: String::new(),
            file_page_size: DEFAULT_FILE_PAGE_SIZE,
            history_enabled: false,
            history_path: None,
        }
    }
}

impl ChatwinConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read,
    /// if any config file fails to parse, or if a value is out of range.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let file_page_size = file
            .window
            .file_page_size
            .unwrap_or(defaults.file_page_size);
        if file_page_size == 0 {
            return Err(ConfigError::Invalid {
                key: "window.file_page_size",
                reason: "must be at least 1",
            });
        }

        // An explicit history file on the command line implies recording.
        let history_path = cli
            .history_file
            .clone()
            .or_else(|| file.history.path.clone());
        let history_enabled = cli.history_file.is_some()
            || file.history.enabled.unwrap_or(defaults.history_enabled);

        Ok(Self {
            account_id: cli
                .account_id
                .or(file.account.id)
                .unwrap_or(defaults.account_id),
            default_mute: file
                .window
                .default_mute_secs
                .map_or(defaults.default_mute, Duration::from_secs),
            default_kick_message: file
                .window
                .default_kick_message
                .clone()
                .unwrap_or(defaults.default_kick_message),
            file_page_size,
            history_enabled,
            history_path,
        })
    }

    /// Argument defaults handed to every window.
    #[must_use]
    pub fn to_defaults(&self) -> WindowDefaults {
        WindowDefaults {
            mute_duration: self.default_mute,
            kick_message: self.default_kick_message.clone(),
            file_page_size: self.file_page_size,
        }
    }

    /// The history file to record into, if recording is on and a path is
    /// known.
    #[must_use]
    pub fn history_file(&self) -> Option<&Path> {
        if self.history_enabled {
            self.history_path.as_deref()
        } else {
            None
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(
    version,
    about = "Dry-run a chat window: normalize a message and show the adapter calls it produces"
)]
#[command(group(
    clap::ArgGroup::new("target")
        .required(true)
        .args(["friend", "group", "member"])
))]
pub struct CliArgs {
    /// Send to this friend.
    #[arg(long)]
    pub friend: Option<i64>,

    /// Send to this group.
    #[arg(long)]
    pub group: Option<i64>,

    /// Send to this group member through a temporary session.
    #[arg(long, requires = "member_group")]
    pub member: Option<i64>,

    /// Group the `--member` is reached through.
    #[arg(long, requires = "member")]
    pub member_group: Option<i64>,

    /// Quote an earlier message by id.
    #[arg(long)]
    pub quote: Option<i64>,

    /// Treat the message as JSON: a string, a unit object or a unit list.
    #[arg(long)]
    pub json: bool,

    /// Message text (or JSON with `--json`).
    #[arg(required = true, num_args = 1..)]
    pub message: Vec<String>,

    /// The bot's own account number.
    #[arg(long, env = "CHATWIN_ACCOUNT_ID")]
    pub account_id: Option<i64>,

    /// Append sent messages to this JSON lines file.
    #[arg(long, env = "CHATWIN_HISTORY_FILE")]
    pub history_file: Option<PathBuf>,

    /// Path to config file (default: `~/.config/chatwin/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "CHATWIN_LOG")]
    pub log_level: String,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("chatwin").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

//! Configuration management for the document editor host.
//!
//! Handles:
//! - Command-line argument parsing (with environment fallbacks)
//! - The optional TOML config file
//! - Merging both over built-in defaults

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::core::{ActionParams, InvocationContext};
use crate::error::ConfigError;
use crate::gateway::GatewayKind;

pub const DEFAULT_URL: &str = "http://localhost:8069";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line arguments for the document editor
#[derive(Debug, Parser)]
#[command(name = "doc-edit")]
#[command(about = "View and edit the text content of stored documents")]
#[command(version)]
pub struct Args {
    /// Base URL of the backend
    #[arg(long, env = "DOC_EDIT_URL", help = "Backend base URL")]
    pub url: Option<String>,

    #[arg(long, env = "DOC_EDIT_DB", help = "Database to authenticate against")]
    pub database: Option<String>,

    #[arg(long, env = "DOC_EDIT_LOGIN")]
    pub login: Option<String>,

    #[arg(long, env = "DOC_EDIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Which backend contract to use for reads and writes
    #[arg(long, value_enum, env = "DOC_EDIT_GATEWAY")]
    pub gateway: Option<GatewayKind>,

    /// Config file; defaults to the user config directory
    #[arg(long, env = "DOC_EDIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Log level (trace, debug, info, warn, error)")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the document's content
    Show {
        #[command(flatten)]
        target: Target,
    },
    /// Replace the document's content and save it
    Edit {
        #[command(flatten)]
        target: Target,

        /// Read new content from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

/// Which document to open
#[derive(Debug, Clone, clap::Args)]
pub struct Target {
    /// Document to open, as an explicit action parameter
    #[arg(long)]
    pub document_id: Option<i64>,

    /// Record active in the caller's current view
    #[arg(long)]
    pub active_id: Option<i64>,

    /// Name to show until the backend reports one
    #[arg(long)]
    pub document_name: Option<String>,
}

impl Target {
    pub fn context(&self) -> InvocationContext {
        InvocationContext {
            params: ActionParams {
                document_id: self.document_id,
                document_name: self.document_name.clone(),
            },
            active_id: self.active_id,
        }
    }
}

/// Contents of the TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub database: Option<String>,
    pub login: Option<String>,
    pub password: Option<String>,
    pub gateway: Option<GatewayKind>,
    pub log_level: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Login used to open a backend session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub database: String,
    pub login: String,
    pub password: String,
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub url: String,
    /// `None` when no complete login is configured
    pub credentials: Option<Credentials>,
    /// Credential fields left unset when only some were given
    pub missing_credentials: Vec<&'static str>,
    pub gateway: GatewayKind,
    pub log_level: String,
    /// File the settings were merged from, if any
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Create configuration from the process command line and environment
    pub fn from_args_and_env() -> Result<(Self, Command), ConfigError> {
        let args = Args::parse();
        let config = Self::from_args(&args)?;
        Ok((config, args.command))
    }

    /// Create configuration from explicit arguments (useful for testing)
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let config_path = match &args.config {
            Some(path) => Some(path.clone()),
            None => default_config_path().filter(|path| path.exists()),
        };

        let file = match &config_path {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let database = args.database.clone().or(file.database);
        let login = args.login.clone().or(file.login);
        let password = args.password.clone().or(file.password);

        // Logging is not up yet; the host reports what is missing.
        let missing_credentials: Vec<&'static str> =
            [("database", &database), ("login", &login), ("password", &password)]
                .into_iter()
                .filter(|(_, value)| value.is_none())
                .map(|(name, _)| name)
                .collect();

        let credentials = match (database, login, password) {
            (Some(database), Some(login), Some(password)) => Some(Credentials {
                database,
                login,
                password,
            }),
            _ => None,
        };
        let missing_credentials = if missing_credentials.len() == 3 {
            Vec::new()
        } else {
            missing_credentials
        };

        Ok(Config {
            url: args
                .url
                .clone()
                .or(file.url)
                .unwrap_or_else(|| DEFAULT_URL.to_string()),
            credentials,
            missing_credentials,
            gateway: args.gateway.or(file.gateway).unwrap_or_default(),
            log_level: args
                .log_level
                .clone()
                .or(file.log_level)
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            config_path,
        })
    }
}

/// `<config_dir>/doc-edit/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("doc-edit").join("config.toml"))
}

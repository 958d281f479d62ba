use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::actions::{
    ClientOptions, DispatchMode, Endpoints, NavigatePolicy, NavigationKind,
};
use crate::client::transport::DEFAULT_BASE_URL;
use crate::toggle::visibility::ToggleMode;

pub const DEFAULT_CONFIG_PATH: &str = "movie-actions.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "movie-actions",
    version,
    about = "Client for the movie list: delete, update and add movies, toggle page elements"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Server base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to config file (default: movie-actions.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Append action events to this JSON-lines file
    #[arg(long, global = true)]
    pub journal: Option<String>,

    /// Page file (YAML) to act on; navigations and alerts are recorded in it
    #[arg(long, global = true)]
    pub page: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delete a movie
    Delete {
        movie: String,

        #[command(flatten)]
        behavior: BehaviorArgs,
    },

    /// Mark a movie as edited
    Update {
        movie: String,

        #[command(flatten)]
        behavior: BehaviorArgs,
    },

    /// Add a movie through the listing's add form
    Add {
        movie: String,

        #[command(flatten)]
        behavior: BehaviorArgs,
    },

    /// Toggle an element of the page file between shown and hidden
    Toggle {
        /// Element id
        #[arg(long)]
        element: String,

        #[arg(long, value_enum)]
        mode: Option<ToggleMode>,
    },
}

/// Per-action overrides of the `behavior` config section.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct BehaviorArgs {
    #[arg(long, value_enum)]
    pub dispatch: Option<DispatchMode>,

    #[arg(long, value_enum)]
    pub navigate: Option<NavigatePolicy>,

    #[arg(long, value_enum)]
    pub navigation: Option<NavigationKind>,

    /// Alert a confirmation before navigating
    #[arg(long)]
    pub confirm: bool,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `movie-actions.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub endpoints: Endpoints,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub toggle: ToggleConfig,
    pub journal: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    pub timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub dispatch: DispatchMode,
    #[serde(default)]
    pub navigate: NavigatePolicy,
    #[serde(default)]
    pub navigation: NavigationKind,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToggleConfig {
    #[serde(default)]
    pub mode: ToggleMode,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => match serde_yaml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = config_path, error = %e, "malformed config, using defaults");
                AppConfig::default()
            }
        },
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Resolve client options: CLI > config > defaults.
pub fn build_client_options(
    config: &AppConfig,
    behavior: &BehaviorArgs,
    toggle_mode: Option<ToggleMode>,
) -> ClientOptions {
    ClientOptions {
        endpoints: config.endpoints.clone(),
        dispatch: behavior.dispatch.unwrap_or(config.behavior.dispatch),
        navigate: behavior.navigate.unwrap_or(config.behavior.navigate),
        navigation: behavior.navigation.unwrap_or(config.behavior.navigation),
        confirm: behavior.confirm || config.behavior.confirm,
        toggle_mode: toggle_mode.unwrap_or(config.toggle.mode),
    }
}

pub fn resolve_base_url<'a>(cli: &'a Cli, config: &'a AppConfig) -> &'a str {
    cli.base_url.as_deref().unwrap_or(&config.server.base_url)
}

pub fn resolve_journal<'a>(cli: &'a Cli, config: &'a AppConfig) -> Option<&'a str> {
    cli.journal.as_deref().or(config.journal.as_deref())
}

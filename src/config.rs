use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
    /// Configuration was installed more than once.
    #[error("Configuration already initialized")]
    AlreadyInitialized,
}

/// Runtime configuration for the Rusty Roster server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Directory of static assets served for unmatched routes.
    pub static_dir: Option<PathBuf>,
    /// Seed the store with the sample roster at startup.
    pub seed_sample_students: bool,
    /// Tracing filter directives (`RUST_LOG` syntax).
    pub log_filter: String,
    /// File that receives a copy of every log line.
    pub log_file: PathBuf,
}

/// Directory probed for static assets when `STATIC_DIR` is unset.
const DEFAULT_STATIC_DIR: &str = "public";
/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
/// Log file used when `ROSTER_LOG_FILE` is unset.
pub const DEFAULT_LOG_FILE: &str = "logs/rusty-roster.log";

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: None,
            static_dir: None,
            seed_sample_students: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup, performing validation along the
    /// way. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let load = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Ok(Self {
            server_port: load("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            static_dir: load("STATIC_DIR")
                .map(PathBuf::from)
                .or_else(default_static_dir),
            seed_sample_students: load("SEED_SAMPLE_STUDENTS")
                .map(|value| parse_flag("SEED_SAMPLE_STUDENTS", &value))
                .transpose()?
                .unwrap_or(false),
            log_filter: load("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_file: load("ROSTER_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}

fn default_static_dir() -> Option<PathBuf> {
    let candidate = PathBuf::from(DEFAULT_STATIC_DIR);
    candidate.is_dir().then_some(candidate)
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue(key.to_string())),
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment (and `.env`), let the caller apply overrides such as
/// command-line flags, and install the result in the global cache.
///
/// Runs before tracing is installed, so `.env` values such as `RUST_LOG` and `ROSTER_LOG_FILE`
/// reach [`crate::logging::init_tracing`].
pub fn init_config<F>(overrides: F) -> Result<&'static Config, ConfigError>
where
    F: FnOnce(&mut Config),
{
    dotenvy::dotenv().ok();
    let mut config = Config::from_env()?;
    overrides(&mut config);
    CONFIG
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized)?;
    Ok(get_config())
}

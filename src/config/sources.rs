use super::models::HandleConfig;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "HANDLEBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/handlebox.toml";
const ENV_PREFIX: &str = "HANDLEBOX";
const ENV_SEPARATOR: &str = "__";
const AUTHORIZATION_ENV_VAR: &str = "HANDLE_AUTHORIZATION";
const AUTHORIZATION_HEADER: &str = "Authorization";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<HandleConfig, ConfigError> {
    load_at(None)
}

/// Same as [`load`], with an explicit file taking the place of `HANDLEBOX_CONFIG`
pub fn load_at(config_path: Option<PathBuf>) -> Result<HandleConfig, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = config_path.unwrap_or_else(|| {
        env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    });

    let mut config = load_from_sources(config_path)?;

    load_secrets(&mut config, env::var(AUTHORIZATION_ENV_VAR).ok());

    Ok(config)
}

/// Apply the Handle API authorization header from the environment
/// An explicitly configured header wins over the environment
fn load_secrets(config: &mut HandleConfig, authorization: Option<String>) {
    let Some(authorization) = authorization else {
        return;
    };

    let configured = config
        .extra_headers
        .keys()
        .any(|name| name.eq_ignore_ascii_case(AUTHORIZATION_HEADER));

    if !configured {
        config
            .extra_headers
            .insert(AUTHORIZATION_HEADER.to_string(), authorization);
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<HandleConfig, ConfigError> {
    load_with_environment(config_path, environment())
}

/// `HANDLEBOX__HANDLE_NAME` -> `handle_name`, `HANDLEBOX__PREFIX__ORG` -> `prefix.org`
///
/// Values stay strings: identifiers such as "000123" or "011111110011" must
/// reach the config verbatim. Booleans and durations are converted when the
/// struct is deserialized.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR)
}

fn load_with_environment(
    config_path: PathBuf,
    environment: Environment,
) -> Result<HandleConfig, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    builder = builder.add_source(environment);

    let config = builder.build()?;
    config.try_deserialize()
}

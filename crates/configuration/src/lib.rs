use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{Config, GatewayConfig, LoggingConfig, QuotesConfig};

/// Prefix of the environment variables that override file settings,
/// e.g. `PROFILER__QUOTES__MAX_CONCURRENT_REQUESTS=8`.
const ENV_PREFIX: &str = "PROFILER";

/// Loads the application configuration from an optional `config.toml` in the working
/// directory, layered under `PROFILER__*` environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Same as [`load_config`] but reads the file at `path`. A missing file is not an error:
/// every section has defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("gateway.protocols")
                .try_parsing(true),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.gateway.graphql_url.is_empty() {
        return Err(ConfigError::ValidationError("gateway.graphql_url must be set".to_string()));
    }
    if !(1..=20).contains(&config.gateway.page_size) {
        return Err(ConfigError::ValidationError(format!(
            "gateway.page_size must be between 1 and 20, got {}",
            config.gateway.page_size
        )));
    }
    if config.quotes.bingx_url.is_empty() || config.quotes.bitget_url.is_empty() {
        return Err(ConfigError::ValidationError("quote provider URLs must be set".to_string()));
    }
    if !(1..=1000).contains(&config.quotes.candle_limit) {
        return Err(ConfigError::ValidationError(format!(
            "quotes.candle_limit must be between 1 and 1000, got {}",
            config.quotes.candle_limit
        )));
    }
    if config.quotes.max_concurrent_requests == 0 {
        return Err(ConfigError::ValidationError(
            "quotes.max_concurrent_requests must be at least 1".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config_from(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.gateway.page_size, 20);
        assert_eq!(config.quotes.candle_limit, 1000);
        assert_eq!(config.gateway.protocols.len(), 29);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn file_values_override_defaults_per_field() {
        let file = write_config(
            r#"
            [quotes]
            max_concurrent_requests = 8

            [logging]
            level = "debug"
            "#,
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.quotes.max_concurrent_requests, 8);
        assert_eq!(config.quotes.candle_limit, 1000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        let file = write_config("[gateway]\npage_size = 50\n");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn rejects_candle_limit_above_provider_ceiling() {
        let file = write_config("[quotes]\ncandle_limit = 1500\n");
        assert!(load_config_from(file.path()).is_err());
    }
}

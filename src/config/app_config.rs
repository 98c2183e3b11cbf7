use serde::Deserialize;

use crate::infrastructure::cache::CacheConfig;
use crate::infrastructure::knowledge::SearchConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Loads `config/default`, then `config/local`, then `APP__*` environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::with_name("config/default").required(false))
                .add_source(config::File::with_name("config/local").required(false))
                .add_source(
                    config::Environment::with_prefix("APP")
                        .separator("__")
                        .list_separator(",")
                        .with_list_parse_key("search.extra_stopwords")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, config::ConfigError> {
        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::cache::CacheBackendType;

    fn from_toml(source: &str) -> AppConfig {
        AppConfig::from_builder(
            config::Config::builder()
                .add_source(config::File::from_str(source, config::FileFormat::Toml)),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = from_toml("");

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.search.default_limit, 10);
        assert_eq!(config.search.max_limit, 100);
        assert_eq!(config.cache.backend, CacheBackendType::Redis);
        assert_eq!(config.cache.namespace, "chat:responses");
    }

    #[test]
    fn test_partial_sections_override_defaults() {
        let config = from_toml(
            r#"
            [logging]
            format = "json"

            [search]
            default_limit = 5
            extra_stopwords = ["portal"]

            [search.weights]
            title = 0.5

            [cache]
            backend = "in_memory"
            default_ttl_secs = 600
            operation_timeout_ms = 1000
            "#,
        );

        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.search.default_limit, 5);
        assert_eq!(config.search.extra_stopwords, vec!["portal".to_string()]);
        assert_eq!(config.search.weights.title, 0.5);
        assert_eq!(config.search.weights.tags, 0.3);
        assert_eq!(config.cache.backend, CacheBackendType::InMemory);
        assert_eq!(config.cache.default_ttl_secs, 600);
        assert_eq!(config.cache.operation_timeout_ms, 1000);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = AppConfig::from_builder(
            config::Config::builder().add_source(config::File::from_str(
                "[cache]\nbackend = \"memcached\"",
                config::FileFormat::Toml,
            )),
        );

        assert!(result.is_err());
    }
}

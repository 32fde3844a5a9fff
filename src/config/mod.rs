// Configuration module entry point
// Layered settings (file, environment, defaults) and the immutable app state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
#[cfg(test)]
pub(crate) use state::test_state;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, RoutesConfig,
    ServerConfig, WordCloudConfig,
};

/// Environment overrides look like `WORDCLOUD_SERVER__PORT=8080`
const ENV_PREFIX: &str = "WORDCLOUD";
const ENV_SEPARATOR: &str = "__";

impl Config {
    /// `config_path` names the file without its extension; a missing file
    /// leaves defaults and environment overrides in effect
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("wordcloud.extra_stop_words")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("logging.max_bytes", 10_485_760)? // 10MB
            .set_default("logging.backup_count", 5)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 60)?
            .set_default("http.server_name", "wordcloud_service/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("wordcloud.output_dir", "wordcloud_images")?
            .set_default("wordcloud.font_index", 0)?
            .set_default("wordcloud.width", 800)?
            .set_default("wordcloud.height", 400)?
            .set_default("wordcloud.background", "white")?
            .set_default("wordcloud.min_font_size", 10)?
            .set_default("wordcloud.max_font_size", 150)?
            .set_default("wordcloud.max_words", 100)?
            .set_default("wordcloud.relative_scaling", 0.5)?
            .set_default("wordcloud.font_step", 1)?
            .set_default("wordcloud.margin", 2)?
            .set_default("wordcloud.hmm", true)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

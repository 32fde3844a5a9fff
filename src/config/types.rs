// Typed settings, one struct per `[section]` of config.toml

use crate::wordcloud::LayoutOptions;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    #[serde(default)]
    pub routes: RoutesConfig,
    pub wordcloud: WordCloudConfig,
}

/// Bind address and runtime size
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; one per core when unset
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// combined, common or json
    pub access_log_format: String,
    /// stdout when unset
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// stderr when unset
    #[serde(default)]
    pub error_log_file: Option<String>,
    /// Rotate a log file once it reaches this size
    pub max_bytes: u64,
    /// Rotated files kept as `<file>.1` .. `<file>.N`
    pub backup_count: usize,
}

/// Connection timeouts (seconds) and the concurrent connection cap
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Value of the `Server` response header
    pub server_name: String,
    pub enable_cors: bool,
    /// Largest accepted request body; bigger ones get 413
    pub max_body_size: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RoutesConfig {
    #[serde(default)]
    pub health: HealthConfig,
}

/// Probe endpoints answered without touching the word-cloud pipeline
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HealthConfig {
    pub enabled: bool,
    pub liveness_path: String,
    pub readiness_path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            liveness_path: "/healthz".into(),
            readiness_path: "/readyz".into(),
        }
    }
}

/// Word-cloud rendering configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WordCloudConfig {
    pub output_dir: String,
    /// Font file; when unset a few common system fonts are tried
    #[serde(default)]
    pub font_path: Option<String>,
    /// Face index inside a font collection (.ttc)
    #[serde(default)]
    pub font_index: u32,
    pub width: u32,
    pub height: u32,
    /// `white`, `black` or `#rrggbb`
    pub background: String,
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub max_words: usize,
    pub relative_scaling: f64,
    pub font_step: u32,
    pub margin: u32,
    /// Fixed seed for reproducible layouts
    #[serde(default)]
    pub random_seed: Option<u64>,
    /// Let the segmenter guess words missing from its dictionary
    pub hmm: bool,
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        let layout = LayoutOptions::default();
        Self {
            output_dir: "wordcloud_images".to_string(),
            font_path: None,
            font_index: 0,
            width: layout.width,
            height: layout.height,
            background: "white".to_string(),
            min_font_size: layout.min_font_size,
            max_font_size: layout.max_font_size,
            max_words: layout.max_words,
            relative_scaling: layout.relative_scaling,
            font_step: layout.font_step,
            margin: layout.margin,
            random_seed: None,
            hmm: true,
            extra_stop_words: Vec::new(),
        }
    }
}

impl WordCloudConfig {
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            width: self.width,
            height: self.height,
            min_font_size: self.min_font_size,
            max_font_size: self.max_font_size,
            max_words: self.max_words,
            relative_scaling: self.relative_scaling.clamp(0.0, 1.0),
            font_step: self.font_step.max(1),
            margin: self.margin,
        }
    }
}

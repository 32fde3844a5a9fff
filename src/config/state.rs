// Application state module
// Built once at startup and shared read-only by every connection

use super::types::Config;
use crate::wordcloud::{FontTypeface, Typeface, WordCloudService};

/// Application state
pub struct AppState {
    pub config: Config,
    pub wordcloud: WordCloudService,
}

impl AppState {
    /// Load the font, build the segmenter and prepare the output directory
    pub fn new(config: &Config) -> Result<Self, String> {
        let settings = &config.wordcloud;
        let typeface = FontTypeface::discover(settings.font_path.as_deref(), settings.font_index)?;
        Self::with_typeface(config, Box::new(typeface))
    }

    pub fn with_typeface(config: &Config, typeface: Box<dyn Typeface>) -> Result<Self, String> {
        Ok(Self {
            config: config.clone(),
            wordcloud: WordCloudService::new(&config.wordcloud, typeface)?,
        })
    }
}

#[cfg(test)]
pub(crate) fn test_state(label: &str) -> AppState {
    use crate::wordcloud::typeface::BlockTypeface;

    let mut config = Config::load_from("does-not-exist/config").unwrap();
    config.wordcloud = crate::wordcloud::test_settings(label);
    AppState::with_typeface(&config, Box::new(BlockTypeface)).unwrap()
}

//! Word-cloud pipeline
//!
//! text -> tokens -> stop-word filter -> frequency layout -> raster -> PNG file.
//! Everything here is synchronous and CPU-bound; callers on an async runtime
//! should run `WordCloudService::generate` on the blocking pool.

mod error;
pub mod layout;
pub mod render;
mod stopwords;
pub mod storage;
mod tokenize;
pub mod typeface;

pub use error::{ErrorKind, WordCloudError};
pub use layout::{LayoutOptions, WordCount};
pub use stopwords::StopWords;
pub use storage::OutputDir;
pub use tokenize::{join_words, Segmenter};
pub use typeface::{FontTypeface, Typeface};

use crate::config::WordCloudConfig;
use crate::logger;
use image::Rgb;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Outcome of a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub path: PathBuf,
    pub file_size: u64,
}

pub struct WordCloudService {
    segmenter: Segmenter,
    stop_words: StopWords,
    typeface: Box<dyn Typeface>,
    options: LayoutOptions,
    background: Rgb<u8>,
    random_seed: Option<u64>,
    output: OutputDir,
}

impl WordCloudService {
    /// Build the service once at startup: loads the segmenter dictionary and
    /// creates the output directory.
    pub fn new(settings: &WordCloudConfig, typeface: Box<dyn Typeface>) -> Result<Self, String> {
        let background = render::parse_color(&settings.background)?;
        let output = OutputDir::prepare(&settings.output_dir).map_err(|e| e.to_string())?;
        logger::log_output_dir_ready(output.path());
        let stop_words = StopWords::new(settings.extra_stop_words.iter().cloned());
        logger::log_info(&format!("[WordCloud] {} stop words loaded", stop_words.len()));

        Ok(Self {
            segmenter: Segmenter::new(settings.hmm),
            stop_words,
            typeface,
            options: settings.layout_options(),
            background,
            random_seed: settings.random_seed,
            output,
        })
    }

    pub fn output_dir(&self) -> &OutputDir {
        &self.output
    }

    /// Segment `text` and drop stop words and single-character tokens
    pub fn filter_words<'a>(&self, text: &'a str) -> Vec<&'a str> {
        self.stop_words.filter(self.segmenter.cut(text))
    }

    pub fn generate(&self, text: &str) -> Result<GeneratedImage, WordCloudError> {
        self.generate_at(text, chrono::Utc::now().timestamp())
    }

    /// Run the pipeline, naming the file after `epoch_secs`
    pub fn generate_at(&self, text: &str, epoch_secs: i64) -> Result<GeneratedImage, WordCloudError> {
        if text.is_empty() {
            return Err(WordCloudError::MissingText);
        }

        let recreated = self.output.ensure()?;
        logger::log_directory_checked(self.output.path(), recreated);

        let words = self.filter_words(text);
        let joined = join_words(&words);
        let ranked = layout::count_words(&joined, self.options.max_words);
        logger::log_words_filtered(words.len(), ranked.len());

        let mut rng = match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let layout = layout::compute_layout(&ranked, self.typeface.as_ref(), &self.options, &mut rng)?;
        logger::log_debug(&format!("[WordCloud] {} of {} words placed", layout.words.len(), ranked.len()));
        let canvas = render::render(&layout, self.typeface.as_ref(), self.background);
        let png = render::encode_png(&canvas)?;

        let path = self.output.persist(&storage::file_name_for(epoch_secs), &png)?;
        logger::log_file_written(&path, png.len());

        let file_size = OutputDir::verify(&path)?;
        logger::log_file_verified(&path, file_size);

        Ok(GeneratedImage { path, file_size })
    }
}

#[cfg(test)]
pub(crate) fn test_settings(label: &str) -> WordCloudConfig {
    WordCloudConfig {
        output_dir: storage::scratch_dir(label).to_string_lossy().into_owned(),
        random_seed: Some(7),
        ..WordCloudConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::typeface::BlockTypeface;
    use super::*;
    use std::fs;

    fn service(label: &str) -> WordCloudService {
        WordCloudService::new(&test_settings(label), Box::new(BlockTypeface)).unwrap()
    }

    #[test]
    fn test_generate_writes_verified_png() {
        let svc = service("generate");
        let image = svc
            .generate_at("Rust 语言 Rust 编程 语言 Rust 编译器 性能 安全", 1_700_000_000)
            .unwrap();

        assert!(image.path.is_absolute());
        assert!(image.path.ends_with("wordcloud_1700000000.png"));
        assert_eq!(image.file_size, fs::metadata(&image.path).unwrap().len());

        let decoded = image::open(&image.path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 400));
        let _ = fs::remove_dir_all(svc.output_dir().path());
    }

    #[test]
    fn test_stop_words_only_yields_no_words_and_no_file() {
        let svc = service("stopwords");
        assert!(svc.filter_words("的了和是").is_empty());
        let result = svc.generate_at("的了和是", 1_700_000_001);
        assert!(matches!(result, Err(WordCloudError::NoWords)));
        assert_eq!(fs::read_dir(svc.output_dir().path()).unwrap().count(), 0);
        let _ = fs::remove_dir_all(svc.output_dir().path());
    }

    #[test]
    fn test_empty_text_is_rejected_before_any_work() {
        let svc = service("empty");
        assert!(matches!(svc.generate_at("", 1), Err(WordCloudError::MissingText)));
        let _ = fs::remove_dir_all(svc.output_dir().path());
    }

    #[test]
    fn test_repeated_calls_produce_time_ordered_names() {
        let svc = service("ordered");
        let text = "数据 分析 数据 可视化 图表 data chart chart";
        let first = svc.generate_at(text, 1_700_000_010).unwrap();
        let second = svc.generate_at(text, 1_700_000_011).unwrap();
        assert!(first.path.file_name() < second.path.file_name());
        assert_eq!(fs::read_dir(svc.output_dir().path()).unwrap().count(), 2);
        let _ = fs::remove_dir_all(svc.output_dir().path());
    }

    #[test]
    fn test_invalid_background_is_a_startup_error() {
        let settings = WordCloudConfig {
            background: "not-a-color".into(),
            ..test_settings("badcolor")
        };
        assert!(WordCloudService::new(&settings, Box::new(BlockTypeface)).is_err());
    }
}

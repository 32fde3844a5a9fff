//! Frequency-weighted word layout
//!
//! Words are ranked by occurrence count and sized relative to the previous
//! word in the ranking, so font size never grows down the list. Each word is
//! placed at a uniformly chosen free position of the canvas; free space is
//! tracked with a summed-area table over an occupancy grid. When no position
//! fits, the font shrinks by `font_step` until it falls below the minimum,
//! at which point layout stops.

use super::error::WordCloudError;
use super::typeface::Typeface;
use image::Rgb;
use rand::Rng;
use std::collections::HashMap;

/// Tunables for layout and canvas size
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub width: u32,
    pub height: u32,
    pub min_font_size: u32,
    pub max_font_size: u32,
    pub max_words: usize,
    /// Weight of relative frequency versus rank when sizing (0.0 ..= 1.0)
    pub relative_scaling: f64,
    pub font_step: u32,
    /// Pixels of padding around each word's bounding box
    pub margin: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
            min_font_size: 10,
            max_font_size: 150,
            max_words: 100,
            relative_scaling: 0.5,
            font_step: 1,
            margin: 2,
        }
    }
}

/// One distinct word and its occurrence count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// A word placed on the canvas; `x`/`y` is the top-left of the text box
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub count: usize,
    pub font_size: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: Rgb<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub words: Vec<PlacedWord>,
}

/// Count whitespace-delimited words, highest count first.
///
/// Tokens must start with an alphanumeric character, which drops stray
/// punctuation the segmenter emits. Ties keep first-appearance order.
pub fn count_words(text: &str, max_words: usize) -> Vec<WordCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for token in text.split_whitespace() {
        if !token.chars().next().is_some_and(char::is_alphanumeric) {
            continue;
        }
        let entry = counts.entry(token).or_insert(0);
        if *entry == 0 {
            order.push(token);
        }
        *entry += 1;
    }

    let mut ranked: Vec<WordCount> = order
        .into_iter()
        .map(|w| WordCount {
            word: w.to_string(),
            count: counts[w],
        })
        .collect();
    // Stable sort keeps first-appearance order among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(max_words);
    ranked
}

/// Lay out ranked words on the canvas
pub fn compute_layout<R: Rng + ?Sized>(
    words: &[WordCount],
    typeface: &dyn Typeface,
    options: &LayoutOptions,
    rng: &mut R,
) -> Result<Layout, WordCloudError> {
    let Some(top) = words.first() else {
        return Err(WordCloudError::NoWords);
    };

    let mut grid = Occupancy::new(options.width, options.height);
    let mut placed = Vec::with_capacity(words.len());
    let max_count = top.count as f64;
    let rs = options.relative_scaling;
    let mut last_freq = 1.0_f64;
    let mut font_size = options.max_font_size;

    for entry in words {
        let freq = entry.count as f64 / max_count;
        if rs > 0.0 {
            let scaled = (rs * (freq / last_freq) + (1.0 - rs)) * f64::from(font_size);
            font_size = scaled.round() as u32;
        }

        let Some(fitted) = largest_fitting_size(&grid, typeface, &entry.word, font_size, options)
        else {
            break;
        };
        font_size = fitted;
        let (w, h) = typeface.measure(&entry.word, font_size as f32);
        let Some((x, y)) = grid.sample_free(w + options.margin, h + options.margin, rng) else {
            break;
        };

        grid.mark(x, y, w + options.margin, h + options.margin);
        placed.push(PlacedWord {
            word: entry.word.clone(),
            count: entry.count,
            font_size,
            x: x + options.margin / 2,
            y: y + options.margin / 2,
            width: w,
            height: h,
            color: random_color(rng),
        });
        last_freq = freq;
    }

    Ok(Layout {
        width: options.width,
        height: options.height,
        words: placed,
    })
}

/// Largest size `start - k * font_step` (k >= 0, size >= minimum) whose box
/// still fits somewhere. A smaller box fits wherever a larger one does, so the
/// search is a bisection over k instead of one full scan per step.
fn largest_fitting_size(
    grid: &Occupancy,
    typeface: &dyn Typeface,
    word: &str,
    start: u32,
    options: &LayoutOptions,
) -> Option<u32> {
    let fits = |size: u32| {
        let (w, h) = typeface.measure(word, size as f32);
        grid.has_free(w + options.margin, h + options.margin)
    };
    if start < options.min_font_size {
        return None;
    }
    if fits(start) {
        return Some(start);
    }

    let step = options.font_step.max(1);
    let max_k = (start - options.min_font_size) / step;
    if max_k == 0 || !fits(start - max_k * step) {
        return None;
    }
    let (mut lo, mut hi) = (1, max_k);
    while lo < hi {
        let mid = (lo + hi) / 2;
        if fits(start - mid * step) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Some(start - hi * step)
}

/// Random hue at 80% saturation and 50% lightness
fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Rgb<u8> {
    hsl_to_rgb(rng.random_range(0.0..360.0), 0.8, 0.5)
}

pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb<u8> {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = (hue.rem_euclid(360.0)) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgb([to_u8(r), to_u8(g), to_u8(b)])
}

/// Occupancy grid with a summed-area table for O(1) box queries
struct Occupancy {
    width: u32,
    height: u32,
    cells: Vec<u8>,
    /// (width + 1) x (height + 1) prefix sums
    sums: Vec<u32>,
}

impl Occupancy {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![0; (width * height) as usize],
            sums: vec![0; ((width + 1) * (height + 1)) as usize],
        }
    }

    fn sum_at(&self, x: u32, y: u32) -> u32 {
        self.sums[(y * (self.width + 1) + x) as usize]
    }

    fn is_free(&self, x: u32, y: u32, w: u32, h: u32) -> bool {
        let total = self.sum_at(x + w, y + h) + self.sum_at(x, y);
        let minus = self.sum_at(x + w, y) + self.sum_at(x, y + h);
        total == minus
    }

    fn box_fits(&self, w: u32, h: u32) -> bool {
        w > 0 && h > 0 && w <= self.width && h <= self.height
    }

    /// Whether a `w` x `h` box fits anywhere; stops at the first free spot
    fn has_free(&self, w: u32, h: u32) -> bool {
        if !self.box_fits(w, h) {
            return false;
        }
        (0..=self.height - h).any(|y| (0..=self.width - w).any(|x| self.is_free(x, y, w, h)))
    }

    /// Pick a uniformly random top-left corner where a `w` x `h` box fits
    fn sample_free<R: Rng + ?Sized>(&self, w: u32, h: u32, rng: &mut R) -> Option<(u32, u32)> {
        if !self.box_fits(w, h) {
            return None;
        }
        let max_x = self.width - w;
        let max_y = self.height - h;

        let mut hits = 0usize;
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.is_free(x, y, w, h) {
                    hits += 1;
                }
            }
        }
        if hits == 0 {
            return None;
        }

        let mut goal = rng.random_range(0..hits);
        for y in 0..=max_y {
            for x in 0..=max_x {
                if self.is_free(x, y, w, h) {
                    if goal == 0 {
                        return Some((x, y));
                    }
                    goal -= 1;
                }
            }
        }
        None
    }

    fn mark(&mut self, x: u32, y: u32, w: u32, h: u32) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for row in y..y_end {
            let start = (row * self.width + x) as usize;
            let end = (row * self.width + x_end) as usize;
            self.cells[start..end].fill(1);
        }
        self.rebuild_from(y);
    }

    /// Recompute prefix sums for rows at and below `y`
    fn rebuild_from(&mut self, y: u32) {
        let stride = (self.width + 1) as usize;
        for row in y..self.height {
            let mut running = 0u32;
            for col in 0..self.width {
                running += u32::from(self.cells[(row * self.width + col) as usize]);
                let above = self.sums[row as usize * stride + col as usize + 1];
                self.sums[(row as usize + 1) * stride + col as usize + 1] = above + running;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordcloud::typeface::BlockTypeface;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_count_words_ranks_by_frequency() {
        let ranked = count_words("苹果 苹果 苹果 香蕉", 100);
        assert_eq!(
            ranked,
            vec![
                WordCount { word: "苹果".into(), count: 3 },
                WordCount { word: "香蕉".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_count_words_ties_keep_first_appearance() {
        let ranked = count_words("river 城市 river 城市 ocean", 100);
        let words: Vec<&str> = ranked.iter().map(|w| w.word.as_str()).collect();
        assert_eq!(words, vec!["river", "城市", "ocean"]);
    }

    #[test]
    fn test_count_words_drops_punctuation_and_truncates() {
        let ranked = count_words("！？ alpha beta gamma alpha", 2);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].word, "alpha");
        assert!(ranked.iter().all(|w| w.word != "！？"));
    }

    #[test]
    fn test_empty_word_list_is_an_error() {
        let result = compute_layout(&[], &BlockTypeface, &LayoutOptions::default(), &mut rng());
        assert!(matches!(result, Err(WordCloudError::NoWords)));
    }

    #[test]
    fn test_font_size_follows_frequency() {
        let ranked = count_words("苹果 苹果 苹果 香蕉", 100);
        let layout =
            compute_layout(&ranked, &BlockTypeface, &LayoutOptions::default(), &mut rng()).unwrap();
        assert_eq!(layout.words.len(), 2);
        let apple = &layout.words[0];
        let banana = &layout.words[1];
        assert_eq!(apple.word, "苹果");
        assert_eq!(apple.font_size, 150);
        assert!(apple.font_size >= banana.font_size);
        assert!(banana.font_size >= 10);
    }

    #[test]
    fn test_font_sizes_bounded_and_non_increasing() {
        let text: Vec<String> = (0..30)
            .flat_map(|i| std::iter::repeat(format!("word{i}")).take(30 - i))
            .collect();
        let ranked = count_words(&text.join(" "), 100);
        let options = LayoutOptions::default();
        let layout = compute_layout(&ranked, &BlockTypeface, &options, &mut rng()).unwrap();

        assert!(!layout.words.is_empty());
        assert!(layout.words.len() <= options.max_words);
        for pair in layout.words.windows(2) {
            assert!(pair[0].font_size >= pair[1].font_size);
        }
        for w in &layout.words {
            assert!((options.min_font_size..=options.max_font_size).contains(&w.font_size));
        }
    }

    #[test]
    fn test_placed_words_do_not_overlap() {
        let text: Vec<String> = (0..30).map(|i| format!("w{i} w{i} w{}", i % 5)).collect();
        let ranked = count_words(&text.join(" "), 100);
        let options = LayoutOptions::default();
        let layout = compute_layout(&ranked, &BlockTypeface, &options, &mut rng()).unwrap();

        for (i, a) in layout.words.iter().enumerate() {
            assert!(a.x + a.width <= options.width);
            assert!(a.y + a.height <= options.height);
            for b in &layout.words[i + 1..] {
                let disjoint = a.x + a.width <= b.x
                    || b.x + b.width <= a.x
                    || a.y + a.height <= b.y
                    || b.y + b.height <= a.y;
                assert!(disjoint, "{} overlaps {}", a.word, b.word);
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let ranked = count_words("alpha alpha beta gamma delta", 100);
        let options = LayoutOptions::default();
        let a = compute_layout(&ranked, &BlockTypeface, &options, &mut rng()).unwrap();
        let b = compute_layout(&ranked, &BlockTypeface, &options, &mut rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_word_too_wide_for_canvas_is_skipped() {
        let ranked = count_words("abcdefghijklmnopqrstuvwxyz", 100);
        let options = LayoutOptions {
            width: 100,
            height: 50,
            ..LayoutOptions::default()
        };
        // 26 chars never fit in 100px at >= 10px per char
        let layout = compute_layout(&ranked, &BlockTypeface, &options, &mut rng()).unwrap();
        assert!(layout.words.is_empty());
    }

    #[test]
    fn test_hsl_primary_colors() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), Rgb([255, 0, 0]));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), Rgb([0, 255, 0]));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), Rgb([0, 0, 255]));
    }
}

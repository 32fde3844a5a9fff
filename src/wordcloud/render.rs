//! Rasterize a layout onto a canvas and encode it as PNG

use super::error::WordCloudError;
use super::layout::Layout;
use super::typeface::Typeface;
use image::{ImageOutputFormat, Rgb, RgbImage};
use std::io::Cursor;

pub fn render(layout: &Layout, typeface: &dyn Typeface, background: Rgb<u8>) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(layout.width, layout.height, background);
    for word in &layout.words {
        typeface.draw(
            &mut canvas,
            &word.word,
            word.font_size as f32,
            word.x,
            word.y,
            word.color,
        );
    }
    canvas
}

pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>, WordCloudError> {
    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    Ok(bytes)
}

/// Parse a background color: a few names or `#rrggbb`
pub fn parse_color(value: &str) -> Result<Rgb<u8>, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "white" => Ok(Rgb([255, 255, 255])),
        "black" => Ok(Rgb([0, 0, 0])),
        hex if hex.len() == 7 && hex.is_ascii() && hex.starts_with('#') => {
            let channel = |range: std::ops::Range<usize>| {
                u8::from_str_radix(&hex[range], 16).map_err(|e| format!("Invalid color '{value}': {e}"))
            };
            Ok(Rgb([channel(1..3)?, channel(3..5)?, channel(5..7)?]))
        }
        _ => Err(format!("Invalid color '{value}': expected a name or #rrggbb")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordcloud::layout::PlacedWord;
    use crate::wordcloud::typeface::BlockTypeface;

    #[test]
    fn test_render_paints_words_on_background() {
        let layout = Layout {
            width: 40,
            height: 20,
            words: vec![PlacedWord {
                word: "ab".into(),
                count: 1,
                font_size: 10,
                x: 5,
                y: 5,
                width: 20,
                height: 10,
                color: Rgb([200, 0, 0]),
            }],
        };
        let canvas = render(&layout, &BlockTypeface, Rgb([255, 255, 255]));
        assert_eq!(canvas.dimensions(), (40, 20));
        assert_eq!(canvas.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(canvas.get_pixel(10, 10), &Rgb([200, 0, 0]));
        assert_eq!(canvas.get_pixel(25, 10), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_encode_png_round_trips_dimensions() {
        let canvas = RgbImage::from_pixel(800, 400, Rgb([255, 255, 255]));
        let bytes = encode_png(&canvas).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (800, 400));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("white"), Ok(Rgb([255, 255, 255])));
        assert_eq!(parse_color("#1a2B3c"), Ok(Rgb([0x1a, 0x2b, 0x3c])));
        assert!(parse_color("#12").is_err());
        assert!(parse_color("mauve").is_err());
        // Seven bytes, but not seven characters
        assert!(parse_color("#1é234").is_err());
    }
}

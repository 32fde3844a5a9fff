//! Text measurement and rasterization
//!
//! The layout only needs box sizes and the renderer only needs to paint a
//! word at a position, so both go through the `Typeface` trait. Production
//! uses an outline font loaded with `ab_glyph`.

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use std::path::Path;

pub trait Typeface: Send + Sync {
    /// Width and height in pixels of `word` rendered at `px`
    fn measure(&self, word: &str, px: f32) -> (u32, u32);

    /// Paint `word` with its top-left corner at (`x`, `y`)
    fn draw(&self, canvas: &mut RgbImage, word: &str, px: f32, x: u32, y: u32, color: Rgb<u8>);
}

/// Outline font (TTF/OTF, or one face of a TTC collection)
pub struct FontTypeface {
    font: FontVec,
}

impl FontTypeface {
    pub fn load(path: &Path, face_index: u32) -> Result<Self, String> {
        let data = std::fs::read(path)
            .map_err(|e| format!("Failed to read font {}: {e}", path.display()))?;
        let font = FontVec::try_from_vec_and_index(data, face_index)
            .map_err(|e| format!("Invalid font {} (face {face_index}): {e}", path.display()))?;
        Ok(Self { font })
    }

    /// Load the configured font, or the first system font found.
    /// CJK-capable faces come first so Chinese words render as glyphs.
    pub fn discover(configured: Option<&str>, face_index: u32) -> Result<Self, String> {
        if let Some(path) = configured {
            return Self::load(Path::new(path), face_index);
        }
        SYSTEM_FONT_CANDIDATES
            .iter()
            .map(Path::new)
            .find(|p| p.is_file())
            .ok_or_else(|| {
                "No font configured and no system font found; set wordcloud.font_path".to_string()
            })
            .and_then(|p| Self::load(p, 0))
    }
}

const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/wenquanyi/wqy-microhei/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
];

impl Typeface for FontTypeface {
    fn measure(&self, word: &str, px: f32) -> (u32, u32) {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let mut width = 0.0_f32;
        let mut prev = None;
        for c in word.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        let height = scaled.ascent() - scaled.descent();
        (width.ceil() as u32, height.ceil() as u32)
    }

    fn draw(&self, canvas: &mut RgbImage, word: &str, px: f32, x: u32, y: u32, color: Rgb<u8>) {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let baseline = y as f32 + scaled.ascent();
        let mut caret = x as f32;
        let mut prev = None;

        for c in word.chars() {
            let mut glyph = scaled.scaled_glyph(c);
            if let Some(p) = prev {
                caret += scaled.kern(p, glyph.id);
            }
            glyph.position = point(caret, baseline);
            caret += scaled.h_advance(glyph.id);
            prev = Some(glyph.id);

            let Some(outlined) = scaled.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px_x = bounds.min.x as i64 + i64::from(gx);
                let px_y = bounds.min.y as i64 + i64::from(gy);
                blend(canvas, px_x, px_y, color, coverage);
            });
        }
    }
}

/// Alpha-blend `color` over the canvas pixel; out-of-bounds writes are dropped
fn blend(canvas: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let alpha = coverage.clamp(0.0, 1.0);
    let pixel = canvas.get_pixel_mut(x, y);
    for (dst, src) in pixel.0.iter_mut().zip(color.0) {
        let mixed = f32::from(src).mul_add(alpha, f32::from(*dst) * (1.0 - alpha));
        *dst = mixed.round() as u8;
    }
}

/// Fixed-metric face drawing solid blocks: every character is a `px` square.
#[cfg(test)]
pub struct BlockTypeface;

#[cfg(test)]
impl Typeface for BlockTypeface {
    fn measure(&self, word: &str, px: f32) -> (u32, u32) {
        let size = px.round() as u32;
        (size * word.chars().count() as u32, size)
    }

    fn draw(&self, canvas: &mut RgbImage, word: &str, px: f32, x: u32, y: u32, color: Rgb<u8>) {
        let (w, h) = self.measure(word, px);
        for dy in 0..h {
            for dx in 0..w {
                blend(canvas, i64::from(x + dx), i64::from(y + dy), color, 1.0);
            }
        }
    }
}

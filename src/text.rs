use std::fs;
use std::path::Path;

use image::{Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::error::{CardError, Result};
use crate::utils::{Position, Size};

/// A TrueType/OpenType font used for the caption line.
pub struct CaptionFont {
    font: Font<'static>,
}

impl CaptionFont {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| CardError::io(path, e))?;
        Self::from_bytes(bytes).ok_or_else(|| CardError::InvalidFont {
            path: path.to_path_buf(),
        })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        Font::try_from_vec(bytes).map(|font| Self { font })
    }

    fn layout(&self, text: &str, px: f32, origin: Position) -> Vec<PositionedGlyph<'_>> {
        let scale = Scale::uniform(px);
        let ascent = self.font.v_metrics(scale).ascent;
        self.font
            .layout(text, scale, point(origin.x, origin.y + ascent))
            .collect()
    }

    /// Advance width and line height of `text` at `px` pixels.
    pub fn measure(&self, text: &str, px: f32) -> Size {
        let scale = Scale::uniform(px);
        let v = self.font.v_metrics(scale);
        let width = self
            .layout(text, px, Position::default())
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0);
        Size::new(width, v.ascent - v.descent)
    }

    /// Alpha-blends `text` onto `canvas` with its top-left corner at `origin`.
    pub fn draw(&self, canvas: &mut RgbaImage, text: &str, px: f32, origin: Position, color: Color) {
        let (width, height) = canvas.dimensions();
        for glyph in self.layout(text, px, origin) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|x, y, coverage| {
                let cx = bb.min.x + x as i32;
                let cy = bb.min.y + y as i32;
                if cx < 0 || cy < 0 || cx as u32 >= width || cy as u32 >= height {
                    return;
                }
                let alpha = coverage * color[3] as f32 / 255.0;
                let dst = canvas.get_pixel_mut(cx as u32, cy as u32);
                *dst = blend(*dst, color, alpha);
            });
        }
    }
}

fn blend(dst: Rgba<u8>, src: Color, alpha: f32) -> Rgba<u8> {
    let mix = |d: u8, s: u8| (s as f32 * alpha + d as f32 * (1.0 - alpha)).round() as u8;
    let a = (alpha * 255.0 + dst.0[3] as f32 * (1.0 - alpha)).round() as u8;
    Rgba([mix(dst.0[0], src[0]), mix(dst.0[1], src[1]), mix(dst.0[2], src[2]), a])
}

//! Font resolution and glyph rasterization for the coin label.
//!
//! [`resolve`] walks an ordered list of font files and keeps the first one
//! that parses. When none does, it falls back to [`BitmapFont`], which is
//! compiled into the binary and cannot fail.

use crate::canvas::Canvas;
use crate::color::Color;
use anyhow::{Context, Result};
use log::{debug, info};
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};

/// A font ready to draw text.
pub enum Face {
    TrueType { font: Font<'static>, path: PathBuf },
    Builtin(BitmapFont),
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Face::TrueType { path, .. } => f.debug_tuple("TrueType").field(path).finish(),
            Face::Builtin(_) => f.write_str("Builtin"),
        }
    }
}

/// Try each candidate in order and return the first font that loads,
/// or the built-in bitmap font if none does.
pub fn resolve(candidates: &[PathBuf]) -> Face {
    let resolved = candidates.iter().find_map(|path| match load_truetype(path) {
        Ok(font) => Some(Face::TrueType {
            font,
            path: path.clone(),
        }),
        Err(err) => {
            debug!("Skipping font candidate: {err:#}");
            None
        }
    });

    let face = resolved.unwrap_or(Face::Builtin(BitmapFont));
    info!("Using {} font", face.describe());
    face
}

fn load_truetype(path: &Path) -> Result<Font<'static>> {
    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read font file {}", path.display()))?;
    Font::try_from_vec(data).with_context(|| format!("{} is not a usable font", path.display()))
}

/// Ink extents of a run of text, relative to the text origin.
///
/// The origin is the top-left of the line box: the ascender line for
/// TrueType fonts, the top of the cell for the bitmap font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

impl Face {
    pub fn describe(&self) -> String {
        match self {
            Face::TrueType { path, .. } => format!("TrueType {}", path.display()),
            Face::Builtin(_) => "built-in bitmap".to_string(),
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Face::Builtin(_))
    }

    /// Measure the inked area of `text` at `size` em pixels.
    /// Text with no visible pixels measures as all zeros.
    pub fn text_bounds(&self, text: &str, size: f32) -> TextBounds {
        let mut bounds: Option<TextBounds> = None;

        self.rasterize(text, size, |x, y, _| {
            let b = bounds.get_or_insert(TextBounds {
                left: x,
                top: y,
                right: x + 1,
                bottom: y + 1,
            });
            b.left = b.left.min(x);
            b.top = b.top.min(y);
            b.right = b.right.max(x + 1);
            b.bottom = b.bottom.max(y + 1);
        });

        bounds.unwrap_or_default()
    }

    /// Draw `text` with its origin at `(x, y)`.
    pub fn draw_text(
        &self,
        canvas: &mut Canvas,
        text: &str,
        x: i32,
        y: i32,
        size: f32,
        color: Color,
    ) {
        self.rasterize(text, size, |dx, dy, coverage| {
            canvas.blend_coverage(x + dx, y + dy, color, coverage);
        });
    }

    /// Feed every pixel with non-zero coverage to `emit` as `(x, y, coverage)`.
    fn rasterize(&self, text: &str, size: f32, mut emit: impl FnMut(i32, i32, f32)) {
        match self {
            Face::TrueType { font, .. } => {
                let scale = em_scale(font, size);
                let ascent = font.v_metrics(scale).ascent;

                for glyph in font.layout(text, scale, point(0.0, ascent)) {
                    let Some(bb) = glyph.pixel_bounding_box() else {
                        continue;
                    };
                    glyph.draw(|gx, gy, coverage| {
                        if coverage > 0.0 {
                            emit(bb.min.x + gx as i32, bb.min.y + gy as i32, coverage);
                        }
                    });
                }
            }
            Face::Builtin(bitmap) => bitmap.rasterize(text, size, emit),
        }
    }
}

/// rusttype scales by the ascent-to-descent height; convert an em size into that.
fn em_scale(font: &Font<'_>, size: f32) -> Scale {
    let units_per_em = font.units_per_em() as f32;
    let unscaled = font.v_metrics_unscaled();
    let line_height = unscaled.ascent - unscaled.descent;

    if units_per_em <= 0.0 || line_height <= 0.0 {
        return Scale::uniform(size);
    }
    Scale::uniform(size * line_height / units_per_em)
}

/// Monospace 5x9 bitmap font with integer scaling.
///
/// Covers digits, `$`, `+`, `-` and space. Other characters advance the pen
/// without drawing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapFont;

const CELL_WIDTH: i32 = 5;
const CELL_HEIGHT: i32 = 9;
const ADVANCE: i32 = CELL_WIDTH + 1;

// One byte per row, bit 4 is the leftmost column
static DOLLAR: [u8; 9] = [
    0b00100, 0b01111, 0b10100, 0b10100, 0b01110, 0b00101, 0b00101, 0b11110, 0b00100,
];
static PLUS: [u8; 9] = [0, 0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0, 0];
static MINUS: [u8; 9] = [0, 0, 0, 0, 0b11111, 0, 0, 0, 0];
static SPACE: [u8; 9] = [0; 9];
static DIGITS: [[u8; 9]; 10] = [
    [0, 0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110, 0],
    [0, 0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110, 0],
    [0, 0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111, 0],
    [0, 0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110, 0],
    [0, 0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010, 0],
    [0, 0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110, 0],
    [0, 0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110, 0],
    [0, 0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0],
    [0, 0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110, 0],
    [0, 0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100, 0],
];

impl BitmapFont {
    pub fn glyph(&self, ch: char) -> Option<&'static [u8; 9]> {
        match ch {
            '$' => Some(&DOLLAR),
            '+' => Some(&PLUS),
            '-' => Some(&MINUS),
            ' ' => Some(&SPACE),
            '0'..='9' => ch
                .to_digit(10)
                .and_then(|digit| DIGITS.get(digit as usize)),
            _ => None,
        }
    }

    /// Pixels per bitmap cell for a requested em size.
    pub fn pixel_scale(&self, size: f32) -> i32 {
        ((size / CELL_HEIGHT as f32).round() as i32).max(1)
    }

    fn rasterize(&self, text: &str, size: f32, mut emit: impl FnMut(i32, i32, f32)) {
        let scale = self.pixel_scale(size);

        for (index, ch) in text.chars().enumerate() {
            let Some(rows) = self.glyph(ch) else {
                continue;
            };
            let pen_x = index as i32 * ADVANCE * scale;

            for (row, bits) in rows.iter().enumerate() {
                for col in 0..CELL_WIDTH {
                    if bits & (1 << (CELL_WIDTH - 1 - col)) == 0 {
                        continue;
                    }
                    let x0 = pen_x + col * scale;
                    let y0 = row as i32 * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            emit(x0 + dx, y0 + dy, 1.0);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PaintMode;

    #[test]
    fn falls_back_to_builtin_when_no_candidate_loads() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_font = dir.path().join("broken.ttf");
        std::fs::write(&not_a_font, b"definitely not a font").unwrap();

        let face = resolve(&[PathBuf::from("/no/such/font.ttf"), not_a_font]);
        assert!(face.is_builtin());
    }

    #[test]
    fn installed_truetype_font_is_preferred() {
        let Some(path) = crate::theme::Theme::default()
            .fonts
            .into_iter()
            .find(|path| path.exists())
        else {
            return;
        };

        let face = resolve(&[path]);
        assert!(!face.is_builtin());
        let bounds = face.text_bounds("$", 60.0);
        assert!(bounds.width() > 0 && bounds.height() > 0);
    }

    #[test]
    fn empty_candidate_list_is_builtin() {
        assert!(resolve(&[]).is_builtin());
    }

    #[test]
    fn builtin_dollar_measures_full_cell() {
        let face = Face::Builtin(BitmapFont);
        // 60 / 9 rounds to 7 pixels per cell
        let bounds = face.text_bounds("$", 60.0);
        assert_eq!(
            bounds,
            TextBounds {
                left: 0,
                top: 0,
                right: 35,
                bottom: 63
            }
        );
    }

    #[test]
    fn builtin_digits_skip_blank_rows() {
        let face = Face::Builtin(BitmapFont);
        let bounds = face.text_bounds("10", 9.0);
        assert_eq!(bounds.top, 1);
        assert_eq!(bounds.bottom, 8);
        assert_eq!(bounds.left, 1);
        assert_eq!(bounds.right, ADVANCE + CELL_WIDTH);
    }

    #[test]
    fn unknown_characters_draw_nothing() {
        let face = Face::Builtin(BitmapFont);
        assert_eq!(face.text_bounds("?", 60.0), TextBounds::default());
        assert_eq!(face.text_bounds("", 60.0).width(), 0);
    }

    #[test]
    fn draw_text_paints_glyph_color() {
        let face = Face::Builtin(BitmapFont);
        let mut canvas = Canvas::new(32, PaintMode::Replace);
        let color = Color::rgb(255, 160, 0);
        face.draw_text(&mut canvas, "+", 2, 2, 9.0, color);

        // Center of the plus: column 2, row 4 of the cell
        assert_eq!(canvas.image().get_pixel(4, 6), &image::Rgba(color.0));
        assert_eq!(canvas.image().get_pixel(2, 2)[3], 0);
    }

    #[test]
    fn tiny_sizes_still_render() {
        let face = Face::Builtin(BitmapFont);
        assert_eq!(BitmapFont.pixel_scale(1.0), 1);
        assert!(face.text_bounds("$", 1.0).width() > 0);
    }
}

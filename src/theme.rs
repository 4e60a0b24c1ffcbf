//! Named configuration values for the icon.
//!
//! Every color, coordinate and size used by [`crate::render::IconRenderer`]
//! lives here. [`Theme::default`] is the stock Learn & Earn icon; a JSON theme
//! file only needs to name the values it changes, everything else falls back
//! to the defaults.

use crate::canvas::PaintMode;
use crate::color::Color;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root of a theme file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Edge length of the square canvas in pixels.
    pub size: u32,

    /// Radius of the rounded-corner mask.
    pub corner_radius: u32,

    /// How primitive colors combine with the pixels underneath.
    pub paint_mode: PaintMode,

    pub gradient: Gradient,
    pub book: Book,
    pub coin: Coin,
    pub plus: PlusBadge,

    /// Decorative dots, drawn last.
    pub dots: Vec<Dot>,
    pub dot_fill: Color,

    /// Font files tried in order for the coin glyph. The built-in bitmap
    /// font is used when none of them loads.
    pub fonts: Vec<PathBuf>,
}

/// Vertical background gradient, `top` at row 0 and `bottom` at the last row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gradient {
    pub top: Color,
    pub bottom: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Book {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub radius: u32,
    pub fill: Color,

    /// Offset of the first page line from the book's top-left corner.
    pub line_offset: [i32; 2],
    pub line_spacing: i32,
    pub line_height: i32,
    pub line_radius: u32,
    pub line_widths: Vec<i32>,
    pub line_fill: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coin {
    pub cx: i32,
    pub cy: i32,
    pub radius: i32,

    pub shadow_offset: [i32; 2],
    pub shadow: Color,
    pub body: Color,
    pub outline: Color,
    pub outline_width: u32,

    pub glyph: String,
    pub glyph_size: f32,
    pub glyph_color: Color,
    /// Added to the glyph's top edge after centering on the coin.
    pub text_nudge_y: i32,

    /// Highlight box `[x0, y0, x1, y1]` relative to the coin center.
    pub shine: [i32; 4],
    pub shine_fill: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlusBadge {
    pub cx: i32,
    pub cy: i32,
    pub radius: i32,
    pub background: Color,

    /// Half-extent of each bar along its long axis.
    pub arm_length: i32,
    /// Half-extent of each bar across its short axis.
    pub arm_thickness: i32,
    pub fill: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dot {
    pub x: i32,
    pub y: i32,
    pub radius: i32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            size: 1024,
            corner_radius: 200,
            paint_mode: PaintMode::Replace,
            gradient: Gradient::default(),
            book: Book::default(),
            coin: Coin::default(),
            plus: PlusBadge::default(),
            dots: vec![
                Dot { x: 150, y: 150, radius: 8 },
                Dot { x: 850, y: 200, radius: 6 },
                Dot { x: 200, y: 800, radius: 10 },
                Dot { x: 800, y: 750, radius: 7 },
            ],
            dot_fill: Color::rgba(255, 255, 255, 150),
            fonts: vec![
                PathBuf::from("/System/Library/Fonts/Arial.ttf"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            ],
        }
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self {
            top: Color::rgb(33, 150, 243),
            bottom: Color::rgb(25, 118, 210),
        }
    }
}

impl Default for Book {
    fn default() -> Self {
        Self {
            x: 200,
            y: 300,
            width: 200,
            height: 280,
            radius: 20,
            fill: Color::rgba(255, 255, 255, 230),
            line_offset: [30, 40],
            line_spacing: 20,
            line_height: 8,
            line_radius: 4,
            line_widths: vec![140, 120, 130, 110, 125, 115, 135, 105, 120, 130, 100, 125],
            line_fill: Color::rgba(33, 150, 243, 180),
        }
    }
}

impl Default for Coin {
    fn default() -> Self {
        Self {
            cx: 600,
            cy: 200,
            radius: 80,
            shadow_offset: [5, 5],
            shadow: Color::rgba(255, 160, 0, 100),
            body: Color::rgb(255, 215, 0),
            outline: Color::rgb(255, 160, 0),
            outline_width: 6,
            glyph: "$".to_string(),
            glyph_size: 60.0,
            glyph_color: Color::rgb(255, 160, 0),
            text_nudge_y: 10,
            shine: [-25, -45, 5, -15],
            shine_fill: Color::rgba(255, 255, 255, 100),
        }
    }
}

impl Default for PlusBadge {
    fn default() -> Self {
        Self {
            cx: 480,
            cy: 480,
            radius: 40,
            background: Color::rgba(255, 255, 255, 230),
            arm_length: 12,
            arm_thickness: 4,
            fill: Color::rgb(33, 150, 243),
        }
    }
}

impl Theme {
    /// Parse a (possibly partial) theme from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let theme: Theme = serde_json::from_str(json).context("Failed to parse theme JSON")?;
        theme.validate()?;
        Ok(theme)
    }

    /// Load a theme file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read theme file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Invalid theme file {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize theme")
    }

    /// Reject values that cannot be rendered without overflowing.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_SIZE {
            anyhow::bail!("Theme size must be between 1 and {MAX_SIZE}");
        }
        if !self.coin.glyph_size.is_finite()
            || self.coin.glyph_size <= 0.0
            || self.coin.glyph_size > MAX_COORD as f32
        {
            anyhow::bail!("Coin glyph size must be a positive number up to {MAX_COORD}");
        }
        if self.coin.glyph.chars().count() > MAX_GLYPH_CHARS {
            anyhow::bail!("Coin glyph must be at most {MAX_GLYPH_CHARS} characters");
        }

        let book = &self.book;
        check_coords("book", &[book.x, book.y, book.width, book.height])?;
        check_coords("book.line_offset", &book.line_offset)?;
        check_coords("book.line_spacing", &[book.line_spacing, book.line_height])?;
        check_coords("book.line_widths", &book.line_widths)?;
        // Last page line must stay in range too
        let lines = book.line_widths.len() as i64;
        let last_line_y = book.y as i64
            + book.line_offset[1] as i64
            + lines.saturating_sub(1) * book.line_spacing as i64;
        check_coord("book.line_widths (last line)", last_line_y)?;

        let coin = &self.coin;
        check_coords("coin", &[coin.cx, coin.cy, coin.radius, coin.text_nudge_y])?;
        check_coords("coin.shadow_offset", &coin.shadow_offset)?;
        check_coords("coin.shine", &coin.shine)?;

        let plus = &self.plus;
        check_coords(
            "plus",
            &[plus.cx, plus.cy, plus.radius, plus.arm_length, plus.arm_thickness],
        )?;

        for dot in &self.dots {
            check_coords("dots", &[dot.x, dot.y, dot.radius])?;
        }

        Ok(())
    }
}

/// Largest accepted canvas edge; bigger buffers are refused up front.
pub const MAX_SIZE: u32 = 16384;

/// Bound on any coordinate or extent. Sums of a handful of these stay far
/// inside `i32`.
pub const MAX_COORD: i32 = 1 << 16;

const MAX_GLYPH_CHARS: usize = 32;

fn check_coord(name: &str, value: i64) -> Result<()> {
    if value.abs() > MAX_COORD as i64 {
        anyhow::bail!("{name} value {value} is outside -{MAX_COORD}..={MAX_COORD}");
    }
    Ok(())
}

fn check_coords(name: &str, values: &[i32]) -> Result<()> {
    values
        .iter()
        .try_for_each(|&value| check_coord(name, value as i64))
}

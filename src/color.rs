use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An 8-bit RGBA color.
///
/// Deserializes from either a CSS color string (`"#2196f3"`,
/// `"rgba(255, 255, 255, 0.9)"`) or a channel array (`[r, g, b]` or
/// `[r, g, b, a]`). Always serializes as `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "[u8; 4]")]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color([r, g, b, a])
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color([r, g, b, 255])
    }

    pub fn alpha(self) -> u8 {
        self.0[3]
    }

    /// Linear interpolation between two colors, rounded to the nearest channel value.
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mut out = [0u8; 4];
        for (i, channel) in out.iter_mut().enumerate() {
            let a = self.0[i] as f32;
            let b = other.0[i] as f32;
            *channel = (a + (b - a) * t).round() as u8;
        }
        Color(out)
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(color: Color) -> Self {
        image::Rgba(color.0)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        color.0
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let srgb = css_color::Srgb::from_str(s.trim())
            .map_err(|_| anyhow::anyhow!("Invalid CSS color: {s:?}"))?;

        Ok(Color([
            unit_to_u8(srgb.red),
            unit_to_u8(srgb.green),
            unit_to_u8(srgb.blue),
            unit_to_u8(srgb.alpha),
        ]))
    }
}

fn unit_to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Css(String),
    Rgba([u8; 4]),
    Rgb([u8; 3]),
}

impl TryFrom<ColorRepr> for Color {
    type Error = anyhow::Error;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Css(s) => s.parse(),
            ColorRepr::Rgba(channels) => Ok(Color(channels)),
            ColorRepr::Rgb([r, g, b]) => Ok(Color::rgb(r, g, b)),
        }
    }
}

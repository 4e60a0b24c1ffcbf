//! Pixel buffers and the primitive rasterizers that draw into them.
//!
//! Shapes are described by inclusive pixel boxes ([`Rect`]). A pixel is
//! covered when its center lies inside the continuous shape, so edges are
//! hard; only glyph coverage from the font rasterizer is fractional.

use crate::color::Color;
use image::{GrayImage, Luma, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// How a primitive's color combines with the pixel it lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaintMode {
    /// The primitive's color, alpha included, overwrites the pixel.
    #[default]
    Replace,
    /// Porter-Duff "over" with straight (non-premultiplied) alpha.
    SourceOver,
}

/// Inclusive pixel box: both `(x0, y0)` and `(x1, y1)` belong to the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Box spanning `(x, y)` to `(x + width, y + height)`.
    pub const fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Square box of half-extent `radius` around a center point.
    pub const fn around(cx: i32, cy: i32, radius: i32) -> Self {
        Self::new(cx - radius, cy - radius, cx + radius, cy + radius)
    }

    /// Box of half-extents `(rx, ry)` around a center point.
    pub const fn centered(cx: i32, cy: i32, rx: i32, ry: i32) -> Self {
        Self::new(cx - rx, cy - ry, cx + rx, cy + ry)
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x0 + dx, self.y0 + dy, self.x1 + dx, self.y1 + dy)
    }

    pub fn is_empty(&self) -> bool {
        self.x1 < self.x0 || self.y1 < self.y0
    }

    fn span_x(&self) -> f32 {
        (self.x1 - self.x0 + 1) as f32
    }

    fn span_y(&self) -> f32 {
        (self.y1 - self.y0 + 1) as f32
    }
}

/// Whether the pixel at `(px, py)` lies inside `rect` with corners rounded by `radius`.
pub fn rounded_rect_contains(rect: Rect, radius: u32, px: i32, py: i32) -> bool {
    if rect.is_empty() || px < rect.x0 || px > rect.x1 || py < rect.y0 || py > rect.y1 {
        return false;
    }

    let r = (radius as f32).min(rect.span_x() / 2.0).min(rect.span_y() / 2.0);
    if r <= 0.0 {
        return true;
    }

    let x = px as f32 + 0.5;
    let y = py as f32 + 0.5;
    let left = rect.x0 as f32;
    let top = rect.y0 as f32;
    let right = rect.x1 as f32 + 1.0;
    let bottom = rect.y1 as f32 + 1.0;

    // Nearest point on the inner rectangle whose corners are the arc centers
    let cx = x.clamp(left + r, right - r);
    let cy = y.clamp(top + r, bottom - r);
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

/// Whether the pixel at `(px, py)` lies inside the ellipse inscribed in `rect`,
/// shrunk by `inset` pixels on every side.
pub fn ellipse_contains(rect: Rect, inset: f32, px: i32, py: i32) -> bool {
    if rect.is_empty() {
        return false;
    }

    let rx = rect.span_x() / 2.0 - inset;
    let ry = rect.span_y() / 2.0 - inset;
    if rx <= 0.0 || ry <= 0.0 {
        return false;
    }

    let cx = rect.x0 as f32 + rect.span_x() / 2.0;
    let cy = rect.y0 as f32 + rect.span_y() / 2.0;
    let nx = (px as f32 + 0.5 - cx) / rx;
    let ny = (py as f32 + 0.5 - cy) / ry;
    nx * nx + ny * ny <= 1.0
}

/// Single-channel coverage buffer used to clip the canvas alpha.
#[derive(Debug, Clone)]
pub struct Mask {
    buffer: GrayImage,
}

impl Mask {
    /// A mask that is zero everywhere.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: GrayImage::new(width, height),
        }
    }

    /// A mask with a fully opaque rounded rectangle spanning the whole area.
    pub fn rounded(width: u32, height: u32, radius: u32) -> Self {
        let mut mask = Self::new(width, height);
        let full = Rect::new(0, 0, width as i32 - 1, height as i32 - 1);
        mask.fill_rounded_rect(full, radius, u8::MAX);
        mask
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: u32, value: u8) {
        for (x, y, pixel) in self.buffer.enumerate_pixels_mut() {
            if rounded_rect_contains(rect, radius, x as i32, y as i32) {
                *pixel = Luma([value]);
            }
        }
    }

    /// Coverage at `(x, y)`; zero outside the mask.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.buffer
            .get_pixel_checked(x, y)
            .map(|pixel| pixel[0])
            .unwrap_or(0)
    }
}

/// RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    mode: PaintMode,
}

impl Canvas {
    /// A fully transparent square canvas.
    pub fn new(size: u32, mode: PaintMode) -> Self {
        Self {
            image: RgbaImage::new(size, size),
            mode,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Overwrite every row with a linear blend from `top` (row 0) to `bottom`
    /// (last row). Channels are rounded to the nearest value.
    pub fn fill_vertical_gradient(&mut self, top: Color, bottom: Color) {
        let last_row = self.height().saturating_sub(1);

        for y in 0..self.height() {
            let t = if last_row == 0 {
                0.0
            } else {
                y as f32 / last_row as f32
            };
            let row_color: Rgba<u8> = top.lerp(bottom, t).into();

            for x in 0..self.width() {
                self.image.put_pixel(x, y, row_color);
            }
        }
    }

    /// Replace the alpha channel with the mask's coverage. Pixels outside the
    /// mask become fully transparent.
    pub fn apply_mask(&mut self, mask: &Mask) {
        for (x, y, pixel) in self.image.enumerate_pixels_mut() {
            pixel[3] = mask.get(x, y);
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.fill_where(rect, color, |_, _| true);
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: u32, color: Color) {
        self.fill_where(rect, color, |x, y| rounded_rect_contains(rect, radius, x, y));
    }

    pub fn fill_ellipse(&mut self, rect: Rect, color: Color) {
        self.fill_where(rect, color, |x, y| ellipse_contains(rect, 0.0, x, y));
    }

    /// Draw an ellipse ring of the given width just inside `rect`.
    pub fn stroke_ellipse(&mut self, rect: Rect, width: u32, color: Color) {
        let inset = width as f32;
        self.fill_where(rect, color, |x, y| {
            ellipse_contains(rect, 0.0, x, y) && !ellipse_contains(rect, inset, x, y)
        });
    }

    /// Mix `color` into one pixel with fractional `coverage` in `[0, 1]`.
    ///
    /// In [`PaintMode::Replace`] every channel, alpha included, moves toward
    /// `color` in proportion to the coverage. In [`PaintMode::SourceOver`]
    /// the coverage scales the source alpha before compositing.
    pub fn blend_coverage(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        let coverage = coverage.clamp(0.0, 1.0);
        if coverage <= 0.0 {
            return;
        }
        let mode = self.mode;
        let Some(pixel) = self.pixel_mut(x, y) else {
            return;
        };

        match mode {
            PaintMode::Replace => {
                for i in 0..4 {
                    let old = pixel[i] as f32;
                    let new = color.0[i] as f32;
                    pixel[i] = (old + (new - old) * coverage).round() as u8;
                }
            }
            PaintMode::SourceOver => {
                let mut scaled = color;
                scaled.0[3] = (color.alpha() as f32 * coverage).round() as u8;
                *pixel = source_over(*pixel, scaled);
            }
        }
    }

    fn fill_where(&mut self, rect: Rect, color: Color, inside: impl Fn(i32, i32) -> bool) {
        if rect.is_empty() || self.width() == 0 || self.height() == 0 {
            return;
        }

        let x_start = rect.x0.max(0);
        let y_start = rect.y0.max(0);
        let x_end = rect.x1.min(self.width() as i32 - 1);
        let y_end = rect.y1.min(self.height() as i32 - 1);

        for y in y_start..=y_end {
            for x in x_start..=x_end {
                if inside(x, y) {
                    self.paint(x as u32, y as u32, color);
                }
            }
        }
    }

    fn paint(&mut self, x: u32, y: u32, color: Color) {
        let mode = self.mode;
        let pixel = self.image.get_pixel_mut(x, y);
        *pixel = match mode {
            PaintMode::Replace => color.into(),
            PaintMode::SourceOver => source_over(*pixel, color),
        };
    }

    fn pixel_mut(&mut self, x: i32, y: i32) -> Option<&mut Rgba<u8>> {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return None;
        }
        Some(self.image.get_pixel_mut(x as u32, y as u32))
    }
}

fn source_over(dst: Rgba<u8>, src: Color) -> Rgba<u8> {
    let sa = src.alpha() as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().take(3).enumerate() {
        let s = src.0[i] as f32;
        let d = dst[i] as f32;
        *channel = ((s * sa + d * da * (1.0 - sa)) / out_a).round() as u8;
    }
    out[3] = (out_a * 255.0).round() as u8;
    Rgba(out)
}

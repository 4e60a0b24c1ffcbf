use crate::canvas::{Canvas, Mask, Rect};
use crate::font::{self, Face};
use crate::theme::Theme;
use image::RgbaImage;
use log::debug;

/// Draws the app icon described by a [`Theme`].
///
/// The font is resolved once when the renderer is built, so repeated calls
/// to [`IconRenderer::render`] produce identical pixels.
#[derive(Debug)]
pub struct IconRenderer {
    theme: Theme,
    face: Face,
}

impl IconRenderer {
    pub fn new(theme: Theme) -> Self {
        let face = font::resolve(&theme.fonts);
        Self { theme, face }
    }

    /// Use an already resolved font instead of walking `theme.fonts`.
    pub fn with_face(theme: Theme, face: Face) -> Self {
        Self { theme, face }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn face(&self) -> &Face {
        &self.face
    }

    pub fn render(&self) -> RgbaImage {
        let theme = &self.theme;
        let mut canvas = Canvas::new(theme.size, theme.paint_mode);

        canvas.fill_vertical_gradient(theme.gradient.top, theme.gradient.bottom);

        // Rounded corners
        let mask = Mask::rounded(theme.size, theme.size, theme.corner_radius);
        canvas.apply_mask(&mask);

        self.draw_book(&mut canvas);
        self.draw_coin(&mut canvas);
        self.draw_plus(&mut canvas);
        self.draw_dots(&mut canvas);

        debug!(
            "Rendered {}x{} icon with {} font",
            canvas.width(),
            canvas.height(),
            self.face.describe()
        );
        canvas.into_image()
    }

    fn draw_book(&self, canvas: &mut Canvas) {
        let book = &self.theme.book;
        let cover = Rect::from_origin(book.x, book.y, book.width, book.height);
        canvas.fill_rounded_rect(cover, book.radius, book.fill);

        let [dx, dy] = book.line_offset;
        let x = book.x + dx;
        for (i, &width) in book.line_widths.iter().enumerate() {
            let y = book.y + dy + i as i32 * book.line_spacing;
            let line = Rect::from_origin(x, y, width, book.line_height);
            canvas.fill_rounded_rect(line, book.line_radius, book.line_fill);
        }
    }

    fn draw_coin(&self, canvas: &mut Canvas) {
        let coin = &self.theme.coin;
        let body = Rect::around(coin.cx, coin.cy, coin.radius);

        let [sx, sy] = coin.shadow_offset;
        canvas.fill_ellipse(body.offset(sx, sy), coin.shadow);
        canvas.fill_ellipse(body, coin.body);
        canvas.stroke_ellipse(body, coin.outline_width, coin.outline);

        // Center the glyph's ink box on the coin, then nudge it down
        let bounds = self.face.text_bounds(&coin.glyph, coin.glyph_size);
        let x = coin.cx - bounds.width() / 2;
        let y = coin.cy - bounds.height() / 2 + coin.text_nudge_y;
        self.face
            .draw_text(canvas, &coin.glyph, x, y, coin.glyph_size, coin.glyph_color);

        let [x0, y0, x1, y1] = coin.shine;
        let shine = Rect::new(x0, y0, x1, y1).offset(coin.cx, coin.cy);
        canvas.fill_ellipse(shine, coin.shine_fill);
    }

    fn draw_plus(&self, canvas: &mut Canvas) {
        let plus = &self.theme.plus;
        canvas.fill_ellipse(Rect::around(plus.cx, plus.cy, plus.radius), plus.background);

        let horizontal = Rect::centered(plus.cx, plus.cy, plus.arm_length, plus.arm_thickness);
        let vertical = Rect::centered(plus.cx, plus.cy, plus.arm_thickness, plus.arm_length);
        canvas.fill_rect(horizontal, plus.fill);
        canvas.fill_rect(vertical, plus.fill);
    }

    fn draw_dots(&self, canvas: &mut Canvas) {
        for dot in &self.theme.dots {
            canvas.fill_ellipse(Rect::around(dot.x, dot.y, dot.radius), self.theme.dot_fill);
        }
    }
}

/// Render `theme`, resolving its font chain first.
pub fn render(theme: &Theme) -> RgbaImage {
    IconRenderer::new(theme.clone()).render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::PaintMode;
    use crate::font::BitmapFont;
    use image::Rgba;

    fn builtin_renderer(theme: Theme) -> IconRenderer {
        IconRenderer::with_face(theme, Face::Builtin(BitmapFont))
    }

    #[test]
    fn default_icon_has_expected_size() {
        let image = builtin_renderer(Theme::default()).render();
        assert_eq!(image.dimensions(), (1024, 1024));
    }

    #[test]
    fn corners_transparent_center_opaque() {
        let image = builtin_renderer(Theme::default()).render();

        for (x, y) in [(0, 0), (1023, 0), (0, 1023), (1023, 1023), (20, 20)] {
            assert_eq!(image.get_pixel(x, y)[3], 0, "corner pixel ({x}, {y})");
        }
        assert_eq!(image.get_pixel(512, 512)[3], 255);
        assert_eq!(image.get_pixel(512, 0)[3], 255);
    }

    #[test]
    fn gradient_blue_channel_descends() {
        let image = builtin_renderer(Theme::default()).render();

        // Column 700 is clear of every shape
        let x = 700;
        assert_eq!(image.get_pixel(x, 0)[2], 243);
        assert_eq!(image.get_pixel(x, 1023)[2], 210);

        let mut previous = u8::MAX;
        for y in 0..1024 {
            let blue = image.get_pixel(x, y)[2];
            assert!(blue <= previous, "blue rose at row {y}");
            previous = blue;
        }
    }

    #[test]
    fn shapes_land_where_expected() {
        let image = builtin_renderer(Theme::default()).render();

        // Book cover, between page lines
        assert_eq!(image.get_pixel(220, 310), &Rgba([255, 255, 255, 230]));
        // First page line
        assert_eq!(image.get_pixel(240, 344), &Rgba([33, 150, 243, 180]));
        // Plus bars and badge
        assert_eq!(image.get_pixel(480, 480), &Rgba([33, 150, 243, 255]));
        assert_eq!(image.get_pixel(450, 480), &Rgba([255, 255, 255, 230]));
        // Dots
        assert_eq!(image.get_pixel(200, 800), &Rgba([255, 255, 255, 150]));
        // Coin outline and shadow peeking out at bottom right
        assert_eq!(image.get_pixel(522, 200), &Rgba([255, 160, 0, 255]));
        assert_eq!(image.get_pixel(660, 260), &Rgba([255, 160, 0, 100]));
        // Shine
        assert_eq!(image.get_pixel(590, 170), &Rgba([255, 255, 255, 100]));
    }

    #[test]
    fn builtin_glyph_is_drawn_on_coin() {
        let image = builtin_renderer(Theme::default()).render();

        let glyph_pixels = (540..660)
            .flat_map(|x| (140..260).map(move |y| (x, y)))
            .filter(|&(x, y)| {
                let dx = x as i32 - 600;
                let dy = y as i32 - 200;
                dx * dx + dy * dy < 60 * 60
            })
            .filter(|&(x, y)| image.get_pixel(x, y) == &Rgba([255, 160, 0, 255]))
            .count();

        assert!(glyph_pixels > 100, "only {glyph_pixels} glyph pixels");
    }

    #[test]
    fn truetype_glyph_is_centered_on_coin() {
        let theme = Theme {
            coin: crate::theme::Coin {
                // Empty shine box so the whole glyph stays visible
                shine: [0, 0, -1, -1],
                ..Default::default()
            },
            ..Theme::default()
        };
        let Some(path) = theme.fonts.iter().find(|path| path.exists()).cloned() else {
            return;
        };
        let face = font::resolve(&[path]);
        if face.is_builtin() {
            return;
        }

        let coin = theme.coin.clone();
        let bounds = face.text_bounds(&coin.glyph, coin.glyph_size);
        let image = IconRenderer::with_face(theme, face).render();

        // Solid glyph pixels inside the coin, clear of the outline ring
        let solid = Rgba(coin.glyph_color.0);
        let mut ink: Option<(i32, i32, i32, i32)> = None;
        for y in 120..280i32 {
            for x in 520..680i32 {
                let dx = x - coin.cx;
                let dy = y - coin.cy;
                let inside = dx * dx + dy * dy < 70 * 70;
                if !inside || image.get_pixel(x as u32, y as u32) != &solid {
                    continue;
                }
                let b = ink.get_or_insert((x, y, x + 1, y + 1));
                *b = (b.0.min(x), b.1.min(y), b.2.max(x + 1), b.3.max(y + 1));
            }
        }
        let (left, top, right, bottom) = ink.expect("glyph should have solid pixels");

        // Origin placement: the measured ink box offset from the text origin
        let origin_x = coin.cx - bounds.width() / 2;
        let origin_y = coin.cy - bounds.height() / 2 + coin.text_nudge_y;
        assert!(left >= origin_x + bounds.left && right <= origin_x + bounds.right);
        assert!(top >= origin_y + bounds.top && bottom <= origin_y + bounds.bottom);

        let expected_x = coin.cx + bounds.left;
        let expected_y = coin.cy + coin.text_nudge_y + bounds.top;
        assert!(((left + right) / 2 - expected_x).abs() <= 3, "x center {left}..{right}");
        assert!(((top + bottom) / 2 - expected_y).abs() <= 3, "y center {top}..{bottom}");
    }

    #[test]
    fn rendering_is_deterministic() {
        let renderer = builtin_renderer(Theme::default());
        assert_eq!(renderer.render(), renderer.render());
    }

    #[test]
    fn source_over_keeps_shapes_opaque() {
        let theme = Theme {
            paint_mode: PaintMode::SourceOver,
            ..Theme::default()
        };
        let image = builtin_renderer(theme).render();

        let cover = image.get_pixel(220, 310);
        assert_eq!(cover[3], 255);
        assert!(cover[0] > 200 && cover[2] > 240);
    }

    #[test]
    fn honours_custom_size() {
        let theme = Theme {
            size: 300,
            corner_radius: 50,
            ..Theme::default()
        };
        let image = builtin_renderer(theme).render();
        assert_eq!(image.dimensions(), (300, 300));
        assert_eq!(image.get_pixel(0, 0)[3], 0);
        assert_eq!(image.get_pixel(150, 20)[3], 255);
    }
}

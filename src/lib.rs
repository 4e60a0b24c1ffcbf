//! Procedural generator for the Learn & Earn app icon.
//!
//! [`render::IconRenderer`] draws the icon described by a [`theme::Theme`]
//! into an RGBA buffer; [`export::export_icon`] writes it out as PNG together
//! with a downscaled preview.

pub mod canvas;
pub mod color;
pub mod export;
pub mod font;
pub mod render;
pub mod theme;

pub use canvas::{Canvas, Mask, PaintMode, Rect};
pub use color::Color;
pub use export::{export_icon, ExportedFiles};
pub use font::{BitmapFont, Face};
pub use render::{render, IconRenderer};
pub use theme::Theme;

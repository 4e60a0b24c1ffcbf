use crate::theme::MAX_SIZE;
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    imageops::{self, FilterType},
    ColorType, ImageEncoder, RgbaImage,
};
use log::info;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

pub const ICON_FILE: &str = "app_icon.png";
pub const PREVIEW_FILE: &str = "app_icon_preview.png";
pub const DEFAULT_PREVIEW_SIZE: u32 = 256;

/// Paths written by [`export_icon`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub icon: PathBuf,
    pub preview: PathBuf,
}

/// Write the full-size icon and a Lanczos-resampled square preview into
/// `out_dir`. The directory must already exist; existing files are overwritten.
pub fn export_icon(icon: &RgbaImage, out_dir: &Path, preview_size: u32) -> Result<ExportedFiles> {
    if preview_size == 0 || preview_size > MAX_SIZE {
        anyhow::bail!("Preview size must be between 1 and {MAX_SIZE}");
    }

    let icon_path = out_dir.join(ICON_FILE);
    save_png(icon, &icon_path)?;
    println!("✓ Generated {}", icon_path.display());

    let preview = imageops::resize(icon, preview_size, preview_size, FilterType::Lanczos3);
    let preview_path = out_dir.join(PREVIEW_FILE);
    save_png(&preview, &preview_path)?;
    println!("✓ Generated {}", preview_path.display());

    Ok(ExportedFiles {
        icon: icon_path,
        preview: preview_path,
    })
}

fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out = BufWriter::new(file);

    write_png(image.as_raw(), &mut out, image.width(), image.height())
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out.flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    info!("Wrote {}x{} {}", image.width(), image.height(), path.display());
    Ok(())
}

// Encode image data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checkerboard(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 128])
            }
        })
    }

    #[test]
    fn writes_both_files_with_expected_sizes() {
        let dir = tempfile::tempdir().unwrap();
        let files = export_icon(&checkerboard(64), dir.path(), 16).unwrap();

        assert_eq!(files.icon, dir.path().join(ICON_FILE));
        assert_eq!(image::open(&files.icon).unwrap().to_rgba8(), checkerboard(64));
        let preview = image::open(&files.preview).unwrap();
        assert_eq!((preview.width(), preview.height()), (16, 16));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = export_icon(&checkerboard(8), &missing, 4).unwrap_err();
        assert!(format!("{err:#}").contains(ICON_FILE));
        assert!(!missing.exists());
    }

    #[test]
    fn rejects_out_of_range_preview() {
        let dir = tempfile::tempdir().unwrap();
        assert!(export_icon(&checkerboard(8), dir.path(), 0).is_err());
        assert!(export_icon(&checkerboard(8), dir.path(), u32::MAX).is_err());
        assert!(!dir.path().join(ICON_FILE).exists());
    }
}

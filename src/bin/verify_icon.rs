use anyhow::{Context, Result};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "assets/app_icon.png".to_string());

    let img = image::open(&path)
        .with_context(|| format!("Failed to open {path}"))?
        .to_rgba8();
    let (width, height) = img.dimensions();

    println!("Checking icon: {}", path);
    println!("Image dimensions: {}x{}", width, height);
    if width == 0 || height == 0 {
        anyhow::bail!("Image is empty");
    }

    let corners = [
        (0, 0),
        (width - 1, 0),
        (0, height - 1),
        (width - 1, height - 1),
    ];
    let mut transparent_corners = 0;
    for (x, y) in corners {
        let alpha = img.get_pixel(x, y)[3];
        println!("  corner ({}, {}) alpha: {}", x, y, alpha);
        if alpha == 0 {
            transparent_corners += 1;
        }
    }

    let center = img.get_pixel(width / 2, height / 2);
    println!(
        "  center ({}, {}) RGBA: [{}, {}, {}, {}]",
        width / 2,
        height / 2,
        center[0],
        center[1],
        center[2],
        center[3]
    );

    if transparent_corners == corners.len() && center[3] > 0 {
        println!("✓ Rounded corners detected, center is visible");
    } else {
        println!("⚠ Icon does not look masked");
    }

    Ok(())
}

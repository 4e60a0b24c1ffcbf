use anyhow::Result;
use appicon_gen::{export, theme::MAX_SIZE, IconRenderer, Theme};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "appicon-gen",
    about = "Draw the app icon and export it with a downscaled preview"
)]
struct Args {
    /// Output directory. It must already exist.
    #[clap(short, long, value_name = "DIR", default_value = "assets")]
    output: PathBuf,

    /// JSON theme overriding the built-in colors, coordinates and fonts.
    #[clap(short, long, value_name = "FILE")]
    theme: Option<PathBuf>,

    /// Edge length of the preview image.
    #[clap(
        long,
        value_name = "PX",
        default_value_t = export::DEFAULT_PREVIEW_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_SIZE as i64)
    )]
    preview_size: u32,

    /// Print the effective theme as JSON and exit without rendering.
    #[clap(long)]
    dump_theme: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let theme = match &args.theme {
        Some(path) => {
            info!("Loading theme from {}", path.display());
            Theme::load(path)?
        }
        None => Theme::default(),
    };

    if args.dump_theme {
        println!("{}", theme.to_json_pretty()?);
        return Ok(());
    }

    let renderer = IconRenderer::new(theme);
    let icon = renderer.render();
    export::export_icon(&icon, &args.output, args.preview_size)?;

    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use ember_renderer::{render, save, Scene};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .parse_default_env()
        .init();

    log::info!("Starting Ember {}", env!("CARGO_PKG_VERSION"));

    let config = args.render_config();
    config
        .validate()
        .with_context(|| format!("invalid render settings ({} samples per pixel)", args.samples))?;

    let scene = Scene::cornell_box();
    let image = render(&scene, &config).context("render failed")?;

    save(&image, &args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}

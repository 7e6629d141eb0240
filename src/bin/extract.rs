use anyhow::{Context, Result};
use base16_extract::{Base16Palette, extract_palette_from_path, render_html, render_json};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Extract a base16 color palette from an image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image path
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Write the palette as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write an HTML swatch sheet to this path
    #[arg(long)]
    html: Option<PathBuf>,

    /// Log cluster details
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "base16_extract=debug"
    } else {
        "base16_extract=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    println!("Processing image \"{}\"...", args.input.display());

    let palette = extract_palette_from_path(&args.input)
        .with_context(|| format!("failed to extract palette from {}", args.input.display()))?;

    write_outputs(&palette, args.json.as_deref(), args.html.as_deref())
}

/// Render every requested output before touching the filesystem. If a later
/// write fails, files written earlier in the same run are removed again.
fn write_outputs(palette: &Base16Palette, json: Option<&Path>, html: Option<&Path>) -> Result<()> {
    let mut outputs = Vec::new();
    if let Some(path) = json {
        outputs.push(("JSON", path, render_json(palette)?));
    }
    if let Some(path) = html {
        outputs.push(("HTML", path, render_html(palette)));
    }

    let mut written: Vec<&Path> = Vec::new();
    for (kind, path, contents) in &outputs {
        if let Err(err) = std::fs::write(path, contents) {
            for done in &written {
                std::fs::remove_file(done).ok();
            }
            return Err(err).with_context(|| format!("failed to write {}", path.display()));
        }
        written.push(*path);
        println!("Writing {kind} palette to \"{}\".", path.display());
    }

    Ok(())
}

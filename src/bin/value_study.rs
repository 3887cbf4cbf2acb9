use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use value_study_wasm::{ProcessingParams, StudyImage, encode_png, swatch_hex, tone_swatches};

/// Turn images into posterized grayscale value studies.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of tonal levels (3, 5 and 9 are the usual presets)
    #[arg(short, long, default_value_t = 5)]
    levels: u32,

    /// Contrast adjustment, -100 to 100
    #[arg(short, long, default_value_t = 0, allow_hyphen_values = true)]
    contrast: i32,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "study_")]
    prefix: String,

    /// Print a JSON summary per file instead of plain text
    #[arg(long)]
    json: bool,
}

fn output_path(input: &Path, out_dir: Option<&Path>, prefix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    match out_dir {
        Some(dir) => dir.join(format!("{stem}.png")),
        None => input.with_file_name(format!("{prefix}{stem}.png")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "value_study_wasm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let params = ProcessingParams::new(args.levels, args.contrast).context("invalid settings")?;
    let tones = swatch_hex(&tone_swatches(params));

    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;
        let study = StudyImage::decode(&bytes).with_context(|| format!("decoding {}", input.display()))?;
        let png = encode_png(&study.render(params)).context("encoding study")?;

        let out_path = output_path(input, args.out_dir.as_deref(), &args.prefix);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, png).with_context(|| format!("writing {}", out_path.display()))?;
        tracing::info!(input = %input.display(), output = %out_path.display(), "Saved value study");

        if args.json {
            let summary = json!({
                "input": input.display().to_string(),
                "output": out_path.display().to_string(),
                "width": study.width(),
                "height": study.height(),
                "levels": params.levels.get(),
                "contrast": params.contrast.get(),
                "tones": tones,
            });
            println!("{summary}");
        } else {
            println!("Saved → {}", out_path.display());
        }
    }

    Ok(())
}

//! silhouette: trace the silhouette of an image and draw a border around it.
//!
//! Reads an image file, strokes the boundary of every non-transparent
//! region (and every hole) with the configured border, and writes the
//! composed image. Optionally exports the traced contours as SVG and
//! prints trace diagnostics.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin silhouette -- [OPTIONS] <INPUT> -o <OUTPUT>
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use silhouette_core::{BorderConfig, BorderState, Color, Dimensions, decode};
use silhouette_export::SvgMetadata;

/// Draw a border around the silhouette of an image's non-transparent content.
#[derive(Parser)]
#[command(name = "silhouette", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    input: PathBuf,

    /// Output image path (written as PNG).
    #[arg(short, long)]
    output: PathBuf,

    /// Border size (0-50). Images whose shorter side is below 150 px scale
    /// this down proportionally.
    #[arg(long, default_value_t = BorderConfig::DEFAULT_BORDER_SIZE)]
    border_size: f32,

    /// Border color as "#rrggbb" or "#rrggbbaa".
    #[arg(long, default_value_t = Color::RED)]
    color: Color,

    /// Full border configuration as JSON (overrides the individual flags).
    #[arg(long)]
    config_json: Option<String>,

    /// Also write the traced contours as SVG to this path.
    #[arg(long, value_name = "PATH")]
    svg: Option<PathBuf>,

    /// Print diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

fn config_from_cli(cli: &Cli) -> Result<BorderConfig, String> {
    let config = if let Some(ref json) = cli.config_json {
        serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"))?
    } else {
        BorderConfig {
            border_size: cli.border_size,
            color: cli.color,
        }
    };
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn write_svg(
    path: &Path,
    cli: &Cli,
    state: &BorderState,
    dimensions: Dimensions,
) -> Result<(), String> {
    let title = cli.input.file_stem().and_then(|s| s.to_str());
    let description = format!(
        "border_size={} color={}",
        state.config().border_size,
        state.config().color
    );
    let config_json = serde_json::to_string(state.config())
        .map_err(|e| format!("Error serializing config: {e}"))?;
    let svg = silhouette_export::to_svg(
        state.outer_contours(),
        state.inner_contours(),
        dimensions,
        &SvgMetadata {
            title,
            description: Some(&description),
            config_json: Some(&config_json),
        },
    );
    std::fs::write(path, &svg).map_err(|e| format!("Error writing {}: {e}", path.display()))?;
    log::info!("SVG written to {} ({} bytes)", path.display(), svg.len());
    Ok(())
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = config_from_cli(cli)?;

    let image_bytes = std::fs::read(&cli.input)
        .map_err(|e| format!("Error reading {}: {e}", cli.input.display()))?;
    log::info!(
        "Image: {} ({} bytes)",
        cli.input.display(),
        image_bytes.len()
    );
    log::debug!("Config: {config:?}");

    let source = decode::decode_rgba(&image_bytes).map_err(|e| e.to_string())?;
    let dimensions = Dimensions {
        width: source.width(),
        height: source.height(),
    };

    let state = BorderState::new(config);
    let composed = silhouette_core::process(&source, &state);

    let png = decode::encode_png(&composed).map_err(|e| e.to_string())?;
    std::fs::write(&cli.output, &png)
        .map_err(|e| format!("Error writing {}: {e}", cli.output.display()))?;
    log::info!("Saved {}", cli.output.display());

    if let Some(ref svg_path) = cli.svg {
        write_svg(svg_path, cli, &state, dimensions)?;
    }

    if let Some(traced) = state.traced() {
        if cli.json {
            let json = serde_json::to_string_pretty(&traced.diagnostics)
                .map_err(|e| format!("Error serializing diagnostics: {e}"))?;
            println!("{json}");
        } else {
            println!("{}", traced.diagnostics.report());
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

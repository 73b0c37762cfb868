//! Pulseplot - pulse sequence diagram layout
//!
//! Reads a pulse sequence description, lays it out on a shared timeline and
//! writes the positioned elements to stdout.
//!
//! # Usage
//!
//! ```bash
//! pulseplot echo.pp --spacing 0.1 --param pH90=1.0 > echo.json
//! pulseplot echo.pp --config echo.toml --format summary
//! ```

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pulseplot_core::{
    config::DiagramConfig,
    dsl::ExternalValue,
    error::{PulseplotError, Result},
    layout::{JsonRenderer, Layout, LayoutEngine},
    PulseSequence,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Full layout as JSON
    Json,
    /// One line per element
    Summary,
}

/// Pulse sequence diagram layout
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the pulse sequence file
    #[arg(value_name = "SEQUENCE_FILE")]
    sequence_file: PathBuf,

    /// Diagram configuration (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Gap before every deferred pulse (overrides the config file)
    #[arg(short, long)]
    spacing: Option<f64>,

    /// External parameter, repeatable
    #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_param(text: &str) -> std::result::Result<(String, String), String> {
    match text.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{text}'")),
    }
}

/// Initialize logging with tracing.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let mut config = match &args.config {
        Some(path) => DiagramConfig::load(path)?,
        None => DiagramConfig::default(),
    };
    if let Some(spacing) = args.spacing {
        config.layout.spacing = spacing;
    }

    let mut params = config.external_params();
    for (key, value) in &args.params {
        params.insert(key.as_str(), ExternalValue::infer(value));
    }

    let sequence = PulseSequence::from_file(&args.sequence_file, &params)?;
    info!(
        file = %args.sequence_file.display(),
        elements = sequence.len(),
        "Loaded sequence"
    );

    let mut renderer = JsonRenderer::new();
    let layout = LayoutEngine::new(config.layout).run(&sequence, &mut renderer);
    info!(
        duration = layout.duration(),
        channels = layout.channels.len(),
        "Laid out sequence"
    );

    let output = match args.format {
        Format::Json => {
            let doc = renderer.into_json()?;
            serde_json::to_string_pretty(&doc).map_err(|e| PulseplotError::OutputError { message: e.to_string() })?
        }
        Format::Summary => summary(&layout),
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{output}").map_err(|e| PulseplotError::OutputError { message: e.to_string() })?;

    Ok(())
}

fn summary(layout: &Layout) -> String {
    let mut lines: Vec<String> = layout
        .elements
        .iter()
        .map(|placed| {
            format!(
                "{:>3}  {:<5}  {:<10}  f={:<6}  start={:<8.3}  end={:.3}",
                placed.index,
                placed.element.kind().name(),
                placed.element.name().unwrap_or("-"),
                placed.element.channel(),
                placed.start,
                placed.end,
            )
        })
        .collect();

    let region = &layout.region;
    if !region.is_empty() {
        lines.push(format!(
            "region  x=[{:.3}, {:.3}]  y=[{:.3}, {:.3}]",
            region.x_low, region.x_high, region.y_low, region.y_high
        ));
    }
    lines.push(format!("channels {:?}", layout.channels.as_slice()));
    lines.join("\n")
}

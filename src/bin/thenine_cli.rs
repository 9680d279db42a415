//! TheNine CLI - brand identity engine
//!
//! Commands: palette, contrast, typography, validate, generate
//! Outputs JSON to stdout, logs to stderr (RUST_LOG)
//! Returns 2 when a brief is rejected
//!
//! The CLI has no external palette source, so only `failureMode` from
//! `--config` takes effect; `paletteSource` is ignored.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use thenine_core::{
    palette::{self, REPAIR_BACKGROUND, WCAG_AA_NORMAL},
    BrandInput, BrandPipeline, EngineConfig, SourceConfig, TypographySelector,
};

#[derive(Parser)]
#[command(name = "thenine-cli")]
#[command(about = "TheNine CLI - deterministic brand identity engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an engine config (JSON); only `failureMode` applies here
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a color palette
    Palette {
        #[arg(short, long, default_value = "Brand")]
        name: String,
        #[arg(short, long, default_value = "technology")]
        industry: String,
        #[arg(short, long, default_value = "modern")]
        mood: String,
    },

    /// WCAG contrast ratio between two hex colors
    Contrast {
        first: String,
        second: String,
    },

    /// Select a font pairing
    Typography {
        #[arg(short, long, default_value = "Brand")]
        name: String,
        #[arg(short, long, default_value = "technology")]
        industry: String,
        #[arg(short, long, default_value = "modern")]
        mood: String,
    },

    /// Validate a brief
    Validate {
        /// JSON payload (BrandInput)
        #[arg(short, long)]
        payload: String,
    },

    /// Generate a complete brand package
    Generate {
        /// JSON payload (BrandInput)
        #[arg(short, long)]
        payload: String,
    },
}

fn emit<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "failed to serialize output");
            ExitCode::FAILURE
        }
    }
}

fn fail(code: u8, message: String) -> ExitCode {
    println!("{}", serde_json::json!({ "success": false, "error": message }));
    ExitCode::from(code)
}

fn parse_brief(payload: &str) -> Result<BrandInput, ExitCode> {
    serde_json::from_str(payload).map_err(|e| fail(1, format!("Invalid payload: {e}")))
}

/// The config the CLI actually runs with: no external source is wired in,
/// so the source settings are reset and disabled.
fn effective_config(loaded: EngineConfig) -> EngineConfig {
    if loaded.palette_source != SourceConfig::default() {
        warn!("paletteSource settings are ignored by the CLI");
    }
    EngineConfig {
        palette_source: SourceConfig {
            enabled: false,
            ..SourceConfig::default()
        },
        failure_mode: loaded.failure_mode,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(c) => effective_config(c),
            Err(e) => return fail(1, e.to_string()),
        },
        None => effective_config(EngineConfig::default()),
    };

    let pipeline = BrandPipeline::new(&config);

    match cli.command {
        Commands::Palette { name, industry, mood } => {
            let palette = palette::generate(&industry, &mood, &name);
            let ratio = palette::check_contrast(&palette.primary.hex, REPAIR_BACKGROUND);
            emit(&serde_json::json!({
                "palette": palette,
                "primary_contrast": ratio.as_ref().ok(),
                "primary_passes_aa": ratio.map(|r| r >= WCAG_AA_NORMAL).unwrap_or(false),
            }))
        }

        Commands::Contrast { first, second } => match palette::check_contrast(&first, &second) {
            Ok(ratio) => emit(&serde_json::json!({
                "ratio": ratio,
                "passes_aa": ratio >= WCAG_AA_NORMAL,
            })),
            Err(e) => fail(1, e.to_string()),
        },

        Commands::Typography { name, industry, mood } => {
            emit(&TypographySelector::new().select(&industry, &mood, &name))
        }

        Commands::Validate { payload } => {
            let input = match parse_brief(&payload) {
                Ok(i) => i,
                Err(code) => return code,
            };
            let result = pipeline.validate_input(&input.normalized());
            let code = emit(&result);
            if result.valid {
                code
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Generate { payload } => {
            let input = match parse_brief(&payload) {
                Ok(i) => i,
                Err(code) => return code,
            };
            match pipeline.build(&input) {
                Ok(package) => emit(&serde_json::json!({
                    "success": true,
                    "package": package,
                })),
                Err(e) => fail(2, e.to_string()),
            }
        }
    }
}

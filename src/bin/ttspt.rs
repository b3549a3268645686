//! CLI front end (C14): `build` and `synth` verbs.
//!
//! Grounded on the teacher's `model.rs` CLI usage pattern (a thin binary
//! wrapping the library's `generate`/`write_wav`) — re-derived here with
//! `clap` derive verbs instead of positional `std::env::args()` parsing,
//! since this spec's surface (`build`, `synth`, optional flags) is wider.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ttspt", about = "Concatenative text-to-speech engine for Brazilian Portuguese")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a voice database from a dataset directory.
    Build {
        dataset_dir: PathBuf,
        output_db: PathBuf,
    },
    /// Synthesize text against a voice database.
    Synth {
        database: PathBuf,
        text: String,
        output_wav: PathBuf,
        speed: Option<f32>,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        rewrite: Option<PathBuf>,
    },
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Build { dataset_dir, output_db } => {
            tracing::info!(dataset = %dataset_dir.display(), output = %output_db.display(), "building voice database");
            tts_pt_br::database::build_database(&dataset_dir, &output_db)
                .with_context(|| format!("building database from {}", dataset_dir.display()))?;
            tracing::info!("build complete");
            Ok(())
        }
        Command::Synth { database, text, output_wav, speed, config, rewrite } => {
            let mut engine = tts_pt_br::open(&database)
                .with_context(|| format!("opening database {}", database.display()))?;

            if let Some(config_path) = &config {
                match engine.load_config(config_path) {
                    Ok(()) => tracing::info!(path = %config_path.display(), "loaded config"),
                    Err(err) => tracing::warn!(path = %config_path.display(), error = %err, "failed to load config, using defaults"),
                }
            }
            if let Some(rewrite_path) = rewrite {
                if rewrite_path.exists() {
                    engine.set_rewrite_path(rewrite_path);
                } else {
                    tracing::info!(path = %rewrite_path.display(), "rewrite rules file not found, skipping");
                }
            }

            let speed = speed.unwrap_or_else(|| engine.default_speed());
            let samples = engine
                .synthesize(&text, speed)
                .with_context(|| format!("synthesizing {text:?}"))?;
            tracing::info!(
                units_found = engine.units_found(),
                units_missing = engine.units_missing(),
                samples = samples.len(),
                "synthesis complete"
            );

            tts_pt_br::wav::write_wav(&output_wav, &samples)
                .with_context(|| format!("writing {}", output_wav.display()))?;
            Ok(())
        }
    }
}

fn main() {
    init_logging();
    if let Err(err) = run() {
        tracing::error!(error = %err, "{err:#}");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use elocute::{Analyzer, AnalyzerConfig, AudioFeatures, FeatureKey};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "elocute",
    about = "Score a spoken attempt against its target phrase"
)]
struct Cli {
    /// JSON analyzer configuration (defaults are used when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract features from a recording, score it and print prosody hints
    Analyze {
        #[arg(long)]
        audio: PathBuf,
        #[arg(long)]
        target: String,
        #[arg(long)]
        transcription: String,
    },
    /// Score a transcription without audio, optionally with a known duration
    Score {
        #[arg(long)]
        target: String,
        #[arg(long)]
        transcription: String,
        /// Utterance length in seconds
        #[arg(long)]
        duration: Option<f64>,
    },
    /// Print the acoustic feature map of a recording
    Features {
        #[arg(long)]
        audio: PathBuf,
        /// Print only this feature (rms_energy, spectral_centroid, zcr, duration)
        #[arg(long, value_parser = parse_feature_key)]
        key: Option<FeatureKey>,
    },
    /// Print the effective configuration
    ShowConfig,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalyzerConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    let analyzer = Analyzer::with_config(config);

    match cli.command {
        Commands::Analyze {
            audio,
            target,
            transcription,
        } => print_json(&analyzer.analyze_path(&target, &transcription, &audio)),
        Commands::Score {
            target,
            transcription,
            duration,
        } => {
            let mut features = AudioFeatures::new();
            if let Some(seconds) = duration {
                features.insert(FeatureKey::Duration, seconds);
            }
            print_json(&analyzer.breakdown(&target, &transcription, &features))
        }
        Commands::Features { audio, key } => {
            let features = elocute::extract_features(&audio, &analyzer.config().features);
            match key {
                Some(key) => print_json(&features.get(key)),
                None => print_json(&features),
            }
        }
        Commands::ShowConfig => print_json(analyzer.config()),
    }
}

fn parse_feature_key(name: &str) -> Result<FeatureKey, String> {
    FeatureKey::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = FeatureKey::ALL.iter().map(|key| key.as_str()).collect();
        format!(
            "unknown feature '{}', expected one of: {}",
            name,
            known.join(", ")
        )
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{json}");
    Ok(())
}

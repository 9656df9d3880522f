use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use clinical_calc_core::GcsCategory;

#[derive(Debug, Parser)]
#[command(
    name = "clinical-calc",
    version,
    about = "COMPASS risk score and PHQ-9 transcript classifier"
)]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the result as JSON instead of a text report
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// COMPASS score for carbon-monoxide poisoning prognosis
    Compass(CompassArgs),
    /// Predict a PHQ-9 score from two interview transcripts
    Phq9(Phq9Args),
}

#[derive(Debug, Args)]
pub struct CompassArgs {
    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(0..=120),
        help = "Age in years"
    )]
    pub age: u32,

    #[arg(
        long,
        help = "Initial GCS band: ge13 | 6-12 | le5 (or \">= 13\", \"6 – 12\", \"<= 5\")"
    )]
    pub gcs: GcsCategory,

    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(0..=10_000),
        help = "Creatine kinase (U/L)"
    )]
    pub ck: u32,

    #[arg(long, default_value_t = false, help = "Lesion present on DWI")]
    pub dwi: bool,

    #[arg(
        long,
        default_value_t = 4,
        value_parser = clap::value_parser!(u8).range(0..=8),
        help = "High-risk cut-off"
    )]
    pub threshold: u8,
}

#[derive(Debug, Args)]
pub struct Phq9Args {
    #[arg(long, conflicts_with = "happiness_file", help = "Experience of Happiness transcript")]
    pub happiness: Option<String>,

    #[arg(long, help = "Read the happiness transcript from a file")]
    pub happiness_file: Option<PathBuf>,

    #[arg(long, conflicts_with = "distress_file", help = "Experience of Distress transcript")]
    pub distress: Option<String>,

    #[arg(long, help = "Read the distress transcript from a file")]
    pub distress_file: Option<PathBuf>,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Debug, Args)]
pub struct ModelArgs {
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(long, env = "FT_MODEL", help = "Fine-tuned model identifier")]
    pub model: Option<String>,

    #[arg(long, env = "OPENAI_BASE_URL")]
    pub base_url: Option<String>,

    #[arg(long, env = "CLINICAL_CALC_API_STYLE", help = "chat | legacy")]
    pub api_style: Option<String>,

    #[arg(
        long,
        env = "CLINICAL_CALC_TIMEOUT_SECS",
        help = "Request timeout; unset waits for the provider"
    )]
    pub timeout_secs: Option<u64>,
}

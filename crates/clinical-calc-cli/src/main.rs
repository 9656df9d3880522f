mod cli;
mod render;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use clinical_calc_core::{compute_score, ScoreInputs, Threshold};
use clinical_calc_llm::config::{
    API_KEY_VAR, API_STYLE_VAR, BASE_URL_VAR, MODEL_VAR, TIMEOUT_VAR,
};
use clinical_calc_llm::{ClassificationRequest, Classifier, ClassifierConfig, OpenAiClient};

use cli::{Cli, Commands, CompassArgs, ModelArgs, Phq9Args};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Compass(args) => run_compass(&args, cli.json),
        Commands::Phq9(args) => run_phq9(&args, cli.json),
    }
}

fn run_compass(args: &CompassArgs, json: bool) -> Result<()> {
    let inputs = ScoreInputs::new(args.age, args.gcs, args.ck, args.dwi)
        .context("invalid COMPASS inputs")?;
    let threshold = Threshold::new(args.threshold).context("invalid threshold")?;
    let result = compute_score(&inputs, threshold);

    tracing::info!(
        total_score = result.total_score,
        risk = %result.risk,
        "COMPASS score computed"
    );

    let report = render::CompassReport {
        inputs: &inputs,
        result: &result,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report);
    }
    Ok(())
}

fn run_phq9(args: &Phq9Args, json: bool) -> Result<()> {
    let config = load_config(&args.model).context("model configuration")?;
    tracing::debug!(?config, "Loaded classifier configuration");

    let happiness = transcript(args.happiness.as_deref(), args.happiness_file.as_deref())?;
    let distress = transcript(args.distress.as_deref(), args.distress_file.as_deref())?;
    let request = ClassificationRequest::new(happiness, distress);

    let client = OpenAiClient::new(&config).context("building HTTP client")?;
    let classification = Classifier::new(client).classify(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
    } else {
        print!("{}", render::ClassificationReport(&classification));
    }
    Ok(())
}

/// Flags already carry their environment fallbacks; validation is shared
/// with [`ClassifierConfig::from_env`].
fn load_config(args: &ModelArgs) -> Result<ClassifierConfig> {
    let timeout = args.timeout_secs.map(|s| s.to_string());
    let config = ClassifierConfig::from_lookup(|key| match key {
        API_KEY_VAR => args.api_key.clone(),
        MODEL_VAR => args.model.clone(),
        BASE_URL_VAR => args.base_url.clone(),
        API_STYLE_VAR => args.api_style.clone(),
        TIMEOUT_VAR => timeout.clone(),
        _ => None,
    })?;
    Ok(config)
}

/// Inline text, file contents, or empty when neither was given.
fn transcript(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("reading transcript {}", path.display())),
        (None, None) => Ok(String::new()),
    }
}

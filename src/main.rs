use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};

use cover_scope::models::VideoRecord;
use cover_scope::orchestrator::{analyze_song, PipelineParams};

/// Cover-song search analytics: classify, score, and cluster a batch of
/// video records for one song query.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a JSON array of raw video records
    #[arg(short, long)]
    input: String,

    /// The song query these records were retrieved for
    #[arg(short, long)]
    song: String,

    /// Where to write the analysis JSON (stdout when omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// Seed for the clustering and projection stages
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    info!("Starting cover-scope - song={:?}, input={}", args.song, args.input);

    let raw = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading records from {}", args.input))?;
    let records: Vec<VideoRecord> =
        serde_json::from_str(&raw).with_context(|| format!("decoding JSON in {}", args.input))?;
    debug!("Loaded {} records", records.len());

    let params = PipelineParams::with_seed(args.seed);
    let analysis = analyze_song(records, &args.song, Utc::now().date_naive(), &params);

    let json = serde_json::to_string_pretty(&analysis)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json.as_bytes())
                .with_context(|| format!("writing analysis to {path}"))?;
            info!("Analysis written - path={}", path);
        }
        None => println!("{json}"),
    }

    Ok(())
}

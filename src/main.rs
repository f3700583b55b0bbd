use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gf_shamir::{decode, session, FieldContext, SchemeConfig};
use num_bigint::BigUint;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gf-shamir", about = "Shamir secret sharing over GF(p)")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a secret, reveal some shares and reconstruct from them.
    Split(SplitArgs),
    /// Recover a message polynomial from possibly corrupted points.
    Decode {
        /// Prime modulus.
        #[arg(long)]
        prime: BigUint,
        /// Message degree bound (deg f < k).
        #[arg(short)]
        k: usize,
        /// Maximum number of corrupted points to correct.
        #[arg(short, default_value_t = 0)]
        e: usize,
        /// Points as `x:y` pairs separated by commas.
        #[arg(long)]
        points: String,
    },
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// JSON file with scheme parameters; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    prime: Option<BigUint>,
    #[arg(long)]
    secret: Option<BigUint>,
    /// Number of shares n.
    #[arg(short = 'n', long)]
    shares: Option<usize>,
    /// Threshold t.
    #[arg(short = 't', long)]
    threshold: Option<usize>,
    /// Shares revealed for reconstruction.
    #[arg(long)]
    revealed: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    /// Print the full report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Split(args) => run_split(args)?,
        Commands::Decode {
            prime,
            k,
            e,
            points,
        } => run_decode(prime, k, e, &points)?,
    }

    Ok(())
}

fn load_config(args: &SplitArgs) -> Result<SchemeConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SchemeConfig::from_json(&json)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SchemeConfig::default(),
    };

    if let Some(prime) = &args.prime {
        config.prime = prime.clone();
    }
    if let Some(secret) = &args.secret {
        config.secret = secret.clone();
    }
    if let Some(shares) = args.shares {
        config.share_count = shares;
    }
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(revealed) = args.revealed {
        config.revealed = revealed;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn run_split(args: SplitArgs) -> Result<()> {
    let config = load_config(&args)?;
    let report = session::run(&config).context("sharing round failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("f(x) = {}", report.polynomial);
    for share in &report.shares {
        println!("share\t{}\t{}", share.x, share.y);
    }
    println!(
        "reconstructed f(0) from {} of {} shares: {} ({})",
        report.revealed.len(),
        report.shares.len(),
        report.reconstructed,
        if report.correct {
            "correct"
        } else {
            "not guaranteed"
        }
    );
    Ok(())
}

fn run_decode(prime: BigUint, k: usize, e: usize, points: &str) -> Result<()> {
    let field = FieldContext::new(prime).context("invalid modulus")?;
    let points = session::parse_points(points, &field)?;

    let message = decode(&points, k, e, &field).context("decoding failed")?;
    println!("f(x) = {}", message);
    Ok(())
}

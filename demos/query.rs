//! Answers probability queries on a Bayesian network read from a YAML definition
//!
//! ```text
//! cargo run --example query -- \
//!     --network demos/rain_sprinkler_wet_grass.yaml \
//!     --evidence wet_grass=wet --given rain=true
//! ```
//!
//! The network's factor graph has a cycle, so `auto` answers with loopy message
//! passing and warns about it. Observing `rain` keeps the answer exact (0.8019);
//! for queries like `--evidence rain=true --given wet_grass=wet` pass
//! `--method brute-force` to get the exact 0.3577.

use std::{error::Error, fs, path::PathBuf};

use bnrs::{
    bayesian::{Evidence, InferenceConfig, InferenceMethod, NetworkDefinition},
    core::LoopyConfig,
    BNError,
};
use clap::{ArgAction, Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Exact on trees, loopy otherwise
    Auto,
    /// Exact message passing
    Exact,
    /// Loopy message passing
    Loopy,
    /// Enumeration of all assignments
    BruteForce,
}

/// Computes P(evidence) or P(evidence | given) on a Bayesian network
#[derive(Parser, Debug)]
#[command(name = "query")]
struct Args {
    /// YAML file with network declarations
    #[arg(long)]
    network: PathBuf,

    /// Observed values as name=value
    #[arg(long, required = true)]
    evidence: Vec<Evidence>,

    /// Conditioning values as name=value
    #[arg(long)]
    given: Vec<Evidence>,

    /// Inference algorithm
    #[arg(long, value_enum, default_value = "auto")]
    method: Method,

    /// Maximal number of loopy iterations
    #[arg(long, default_value = "100")]
    max_steps: usize,

    /// Convergence threshold of loopy message passing
    #[arg(long, default_value = "0.001")]
    threshold: f64,

    /// Verbosity, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let definition: NetworkDefinition = serde_yaml::from_str(&fs::read_to_string(&args.network)?)?;
    let network = definition.into_network()?;
    info!(path = %args.network.display(), nodes = network.len(), "network loaded");

    let joint: Vec<Evidence> = args.evidence.iter().chain(&args.given).cloned().collect();
    let probability = match args.method {
        Method::BruteForce => {
            let dividend = network.marginalize(&joint)?;
            let divisor = network.marginalize(&args.given)?;
            if divisor <= 0f64 {
                return Err(BNError::ZeroProbabilityEvidence.into());
            }
            dividend / divisor
        }
        method => {
            let method = match method {
                Method::Exact => InferenceMethod::Exact,
                Method::Loopy => InferenceMethod::Loopy,
                _ => InferenceMethod::Auto,
            };
            let config = InferenceConfig {
                method,
                loopy: LoopyConfig {
                    max_steps: args.max_steps,
                    threshold: args.threshold,
                    ..LoopyConfig::default()
                },
            };
            network.conditional_probability(&args.evidence, &args.given, &config)?
        }
    };

    let query: Vec<String> = args.evidence.iter().map(ToString::to_string).collect();
    let given: Vec<String> = args.given.iter().map(ToString::to_string).collect();
    if given.is_empty() {
        println!("P({}) = {probability}", query.join(", "));
    } else {
        println!("P({} | {}) = {probability}", query.join(", "), given.join(", "));
    }
    Ok(())
}

use std::path::PathBuf;

use bayesnet_fixtures::GeneratorConfig;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bayesnet",
    about = "Discrete Bayesian networks: generate, inspect and evaluate",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// TOML file with [network] and [generator] tables
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a network and evaluate random assignments
    Demo(DemoArgs),
    /// Generate a network and validate its distributions
    Check(GeneratorArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct GeneratorArgs {
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub vertices: Option<usize>,
    #[arg(long)]
    pub max_ancestors: Option<usize>,
    #[arg(long)]
    pub min_events: Option<usize>,
    #[arg(long)]
    pub max_events: Option<usize>,
    /// Largest number of cells allowed in a single CPT
    #[arg(long)]
    pub max_cells: Option<usize>,
}

impl GeneratorArgs {
    /// Override `config` with every flag given on the command line.
    pub fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(vertices) = self.vertices {
            config.vertices = vertices;
        }
        if let Some(max_ancestors) = self.max_ancestors {
            config.max_ancestors = max_ancestors;
        }
        if let Some(min_events) = self.min_events {
            config.min_events = min_events;
        }
        if let Some(max_events) = self.max_events {
            config.max_events = max_events;
        }
        if let Some(max_cells) = self.max_cells {
            config.max_cells = max_cells;
        }
    }
}

#[derive(Args)]
pub struct DemoArgs {
    #[command(flatten)]
    pub generator: GeneratorArgs,
    /// Number of random assignments to evaluate
    #[arg(long, default_value_t = 5)]
    pub samples: usize,
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use compound_atlas::Reconcile;

#[derive(Parser)]
#[command(
    name = "catlas",
    about = "Compound similarity networks, clusters and layouts",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute neighbor lists from compound fingerprints
    #[command(visible_alias = "s")]
    Similarity(SimilarityArgs),

    /// Run the full analysis: similarity graph, clusters, layout and hulls
    #[command(visible_alias = "l")]
    Layout(LayoutArgs),

    /// Export the similarity matrix in a chosen compound order
    #[command(visible_alias = "m")]
    Matrix(MatrixArgs),
}

impl Command {
    pub fn quiet(&self) -> bool {
        match self {
            Command::Similarity(args) => args.io.quiet,
            Command::Layout(args) => args.io.quiet,
            Command::Matrix(args) => args.io.quiet,
        }
    }
}

/// I/O options shared by all commands.
#[derive(Args)]
pub struct IoOptions {
    /// Compound records as a JSON array (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Similarity source and graph options.
#[derive(Args)]
#[command(next_help_heading = "Similarity")]
pub struct SimilarityOptions {
    /// Precomputed neighbor map ({name: [{compound, similarity}]}) used instead of fingerprints
    #[arg(long, value_name = "FILE")]
    pub similarities: Option<PathBuf>,

    /// How to combine the two stored directions of a pair
    #[arg(long, value_name = "POLICY", default_value = "average")]
    pub reconcile: ReconcileArg,
}

#[derive(Args)]
#[command(next_help_heading = "Similarity Graph")]
pub struct GraphOptions {
    /// Minimum similarity for an edge
    #[arg(short, long, value_name = "T", default_value = "0.65")]
    pub threshold: f64,
}

#[derive(Args)]
#[command(next_help_heading = "Clustering")]
pub struct ClusterOptions {
    /// Descriptor to cluster on (weight, log_p, log_d, pka, tpsa, potency)
    #[arg(short, long, value_name = "FEATURE", default_value = "potency")]
    pub feature: String,

    /// Number of clusters
    #[arg(short = 'k', long = "clusters", value_name = "K", default_value = "5")]
    pub k: usize,

    /// Maximum k-means iterations
    #[arg(long = "max-iter", value_name = "N", default_value = "50")]
    pub max_iterations: usize,

    /// Skip clustering and hulls
    #[arg(long, conflicts_with_all = ["feature", "k"])]
    pub no_clusters: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Layout")]
pub struct LayoutOptions {
    /// Canvas width (px)
    #[arg(long, value_name = "PX", default_value = "800")]
    pub width: f64,

    /// Canvas height (px)
    #[arg(long, value_name = "PX", default_value = "600")]
    pub height: f64,

    /// Maximum simulation ticks
    #[arg(long, value_name = "N", default_value = "300")]
    pub ticks: usize,

    /// Custom force parameters (TOML file)
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,
}

#[derive(Args)]
pub struct SimilarityArgs {
    #[command(flatten)]
    pub io: IoOptions,
}

#[derive(Args)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub similarity: SimilarityOptions,

    #[command(flatten)]
    pub graph: GraphOptions,

    #[command(flatten)]
    pub cluster: ClusterOptions,

    #[command(flatten)]
    pub layout: LayoutOptions,
}

#[derive(Args)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub io: IoOptions,

    #[command(flatten)]
    pub similarity: SimilarityOptions,

    /// JSON array of compound ids giving the row/column order (input order if omitted)
    #[arg(long, value_name = "FILE")]
    pub order: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum ReconcileArg {
    /// Mean of both directions
    #[default]
    Average,
    /// Value stored on the row compound's list, falling back to the other
    #[value(name = "prefer-forward", alias = "forward")]
    PreferForward,
    /// Fail when the directions disagree
    Strict,
}

impl From<ReconcileArg> for Reconcile {
    fn from(arg: ReconcileArg) -> Self {
        match arg {
            ReconcileArg::Average => Reconcile::Average,
            ReconcileArg::PreferForward => Reconcile::PreferForward,
            ReconcileArg::Strict => Reconcile::Strict,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where the phylogeny comes from.
#[derive(ClapArgs, Debug, Clone)]
pub struct ReferenceArgs {
    /// Phylogeny tree as nested JSON (plain or compressed)
    #[arg(long)]
    pub tree: PathBuf,
    /// Mutation weight table, `<mutation> <weight>` per line
    #[arg(long)]
    pub weights: Option<PathBuf>,
    /// Configuration file to use instead of the user config
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Keep the effective settings, flags included, as the user default
    #[arg(long)]
    pub save_config: bool,
}

/// Command-line overrides of the configured thresholds.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ThresholdArgs {
    /// Allele fraction above which a second allele forms the minor profile
    #[arg(long)]
    pub split_threshold: Option<f64>,
    /// Allele fraction at which a call counts as fixed
    #[arg(long)]
    pub fixed_threshold: Option<f64>,
    /// Minimum minor haplogroup quality for a YES verdict
    #[arg(long)]
    pub min_quality: Option<f64>,
    /// Tree distance (edges) that major and minor haplogroup must exceed for a YES verdict
    #[arg(long)]
    pub min_distance: Option<f64>,
    /// Minimum contamination level for a YES verdict
    #[arg(long)]
    pub min_level: Option<f64>,
    /// Worker threads (0 uses every core)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect contamination in the samples of a single VCF file
    Contamination {
        /// Input VCF/BCF file (exactly one)
        #[arg(required = true)]
        input: Vec<PathBuf>,
        #[command(flatten)]
        reference: ReferenceArgs,
        /// Tab-separated contamination report
        #[arg(short = 'o', long = "output", default_value = "contamination.txt")]
        output: PathBuf,
        /// JSON report with per-sample results and the run summary
        #[arg(long)]
        report: Option<PathBuf>,
        /// HSD file with the major profile of every sample
        #[arg(long)]
        hsd: Option<PathBuf>,
        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Assign a haplogroup to the major profile of every sample
    Classify {
        /// Input VCF/BCF file (exactly one)
        #[arg(required = true)]
        input: Vec<PathBuf>,
        #[command(flatten)]
        reference: ReferenceArgs,
        /// Output file for haplogroup results
        #[arg(short = 'o', long = "output", default_value = "haplogroups.txt")]
        output: PathBuf,
        /// Write HSD instead of the haplogroup table
        #[arg(long)]
        hsd: bool,
    },
}

use clap::{Args, Parser, Subcommand, ValueEnum};
use molscreen::core::ensemble::gate::ImputationPolicy;
use molscreen::core::ensemble::vote::TiePolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "molscreen CLI - 3D conformer generation and consensus activity classification for small molecules.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the lowest-energy 3D conformer of each SMILES and write them to an SD file.
    Conformers(ConformersArgs),
    /// Classify molecules from a descriptor table by majority vote of a model ensemble.
    Classify(ClassifyArgs),
}

/// Arguments for the `conformers` subcommand.
#[derive(Args, Debug)]
pub struct ConformersArgs {
    // --- Input ---
    /// A single SMILES string, named `Molecule_1` in the output.
    #[arg(short, long, value_name = "SMILES", conflicts_with = "file")]
    pub smiles: Option<String>,

    /// A file with one SMILES per line; line i is named `Molecule_i`.
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Path for the output SD file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Search Overrides ---
    /// Number of conformers embedded per molecule.
    #[arg(short = 'n', long = "num-conformers", value_name = "INT")]
    pub num_conformers: Option<usize>,

    /// Seed of the embedding random number generator.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Maximum minimizer iterations per conformer.
    #[arg(long, value_name = "INT")]
    pub max_iterations: Option<usize>,

    /// Embedding retries per conformer before it is dropped.
    #[arg(long, value_name = "INT")]
    pub max_embed_attempts: Option<usize>,

    /// Wall-clock optimization budget per molecule, in seconds.
    #[arg(long, value_name = "SECS")]
    pub time_budget: Option<f64>,

    /// Force-field parameter sets tried in order. Each is `typed`, `universal` or a path
    /// to a parameter file. Can be used multiple times.
    #[arg(long = "forcefield", value_name = "NAME_OR_PATH")]
    pub forcefields: Vec<String>,
}

/// Arguments for the `classify` subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Path to the descriptor table (CSV with a `Name` column).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path for the predictions CSV.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Label given when exactly half of an even-sized ensemble votes positive.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub tie_policy: Option<TieArg>,

    /// Treatment of blank or NaN descriptor values.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub imputation: Option<ImputationArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieArg {
    Negative,
    Positive,
}

impl From<TieArg> for TiePolicy {
    fn from(arg: TieArg) -> Self {
        match arg {
            TieArg::Negative => TiePolicy::Negative,
            TieArg::Positive => TiePolicy::Positive,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImputationArg {
    Zero,
    Exclude,
}

impl From<ImputationArg> for ImputationPolicy {
    fn from(arg: ImputationArg) -> Self {
        match arg {
            ImputationArg::Zero => ImputationPolicy::Zero,
            ImputationArg::Exclude => ImputationPolicy::Exclude,
        }
    }
}

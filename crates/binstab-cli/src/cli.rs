use crate::utils::parser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "binstab CLI - Predict and evaluate the thermodynamic stability of binary chemical systems from compositional descriptors.",
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
    /// Compare candidate classifiers with grouped k-fold cross-validation.
    Evaluate(EvaluateArgs),
    /// Fit one classifier on a labelled table and save it as a model file.
    Train(TrainArgs),
    /// Predict stability vectors for a table using a saved model file.
    Predict(PredictArgs),
    /// Write the per-compound feature table without fitting anything.
    Featurize(FeaturizeArgs),
}

/// Arguments shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to the input table of binary systems (CSV or other delimited text).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the field delimiter of the input and output tables ("tab" for TSV).
    #[arg(short, long, value_name = "CHAR", value_parser = parser::parse_delimiter)]
    pub delimiter: Option<u8>,

    /// Randomly keep only this many input rows.
    #[arg(long, value_name = "INT")]
    pub subsample: Option<usize>,

    /// Keep records that contain a noble gas, overriding the config file.
    #[arg(long)]
    pub keep_noble_gases: bool,

    /// Formation energy table (`formula,formation_energy_per_atom`) for the
    /// cohesive-energy feature.
    #[arg(long, value_name = "PATH", conflicts_with = "api_key_file")]
    pub formation_energies: Option<PathBuf>,

    /// File holding a Materials Project API key; formation energies for the
    /// cohesive-energy feature are then fetched from the Materials Project.
    #[arg(long, value_name = "PATH")]
    pub api_key_file: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S evaluation.n-splits=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// A group to handle mutually exclusive oversampling flags.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct OversampleFlags {
    /// Balance the classes of every training set by random oversampling.
    #[arg(long)]
    pub oversample: bool,
    /// Train on the data as-is.
    #[arg(long)]
    pub no_oversample: bool,
}

impl OversampleFlags {
    pub fn resolve(self) -> Option<bool> {
        if self.oversample {
            Some(true)
        } else if self.no_oversample {
            Some(false)
        } else {
            None
        }
    }
}

/// Arguments for the `evaluate` subcommand.
#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path for the metrics table (one row per model).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Override the number of folds.
    #[arg(short = 'k', long, value_name = "INT")]
    pub n_splits: Option<usize>,

    /// Override the number of models evaluated concurrently.
    #[arg(short, long, value_name = "INT")]
    pub workers: Option<usize>,

    /// Override the random seed used for oversampling each training fold.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub oversample: OversampleFlags,
}

/// Arguments for the `train` subcommand.
#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path for the trained model file (JSON).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Name of the model to train, as listed in `[[models]]` (or one of the
    /// default model types when the config lists none).
    #[arg(long, required = true, value_name = "NAME")]
    pub model: String,

    /// Override the random seed used for oversampling the training set.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub oversample: OversampleFlags,
}

/// Arguments for the `predict` subcommand.
#[derive(Args, Debug)]
pub struct PredictArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path for the output table with the predicted stability column.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Path to a model file written by `binstab train`.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub model: PathBuf,

    /// Override the name of the appended prediction column.
    #[arg(long, value_name = "NAME")]
    pub output_column: Option<String>,
}

/// Arguments for the `featurize` subcommand.
#[derive(Args, Debug)]
pub struct FeaturizeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Path for the feature table (one row per compound).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
}

use super::{build_featurizer, ensure_parent_dir};
use crate::cli::TrainArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use binstab::engine::error::EngineError;
use binstab::engine::pipeline;
use binstab::engine::progress::ProgressReporter;
use binstab::workflows;
use tracing::info;

pub fn run(args: TrainArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.common.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let (config, selection) = partial_config.merge_train(&args)?;
    let featurizer = build_featurizer(&selection)?;

    let table = pipeline::load_table(&args.common.input, &config.data)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Training '{}' ({})...",
        config.candidate.name,
        config.candidate.spec.kind()
    );
    let artifact = workflows::train::run(&table, &config, &featurizer, &reporter)?;

    ensure_parent_dir(&args.output)?;
    artifact.save(&args.output).map_err(EngineError::from)?;
    info!(
        "Saved model '{}' with {} features to {:?}",
        artifact.name,
        artifact.feature_labels.len(),
        &args.output
    );
    println!("✓ Model written to: {}", args.output.display());
    Ok(())
}

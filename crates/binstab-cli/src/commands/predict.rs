use super::{build_featurizer, ensure_parent_dir};
use crate::cli::PredictArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use binstab::core::learn::artifact::ModelArtifact;
use binstab::engine::error::EngineError;
use binstab::engine::pipeline;
use binstab::engine::progress::ProgressReporter;
use binstab::workflows;
use tracing::info;

pub fn run(args: PredictArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.common.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let (config, selection) = partial_config.merge_predict(&args)?;

    info!("Loading model from {:?}", &args.model);
    let artifact = ModelArtifact::load(&args.model).map_err(EngineError::from)?;
    let featurizer = build_featurizer(&selection)?;

    let table = pipeline::load_table(&args.common.input, &config.data)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Predicting with model '{}'...", artifact.name);
    let output = workflows::predict::run(&table, &artifact, &config, &featurizer, &reporter)?;

    ensure_parent_dir(&args.output)?;
    output
        .write_to_path(&args.output, config.data.delimiter)
        .map_err(EngineError::from)?;
    println!(
        "✓ {} prediction(s) written to: {}",
        output.len(),
        args.output.display()
    );
    Ok(())
}

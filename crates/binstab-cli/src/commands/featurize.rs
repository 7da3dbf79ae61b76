use super::{build_featurizer, ensure_parent_dir};
use crate::cli::FeaturizeArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use binstab::engine::error::EngineError;
use binstab::engine::pipeline;
use binstab::engine::progress::ProgressReporter;
use binstab::workflows;
use tracing::info;

pub fn run(args: FeaturizeArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.common.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let (config, selection) = partial_config.merge_featurize(&args)?;
    let featurizer = build_featurizer(&selection)?;

    let table = pipeline::load_table(&args.common.input, &config.data)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let output = workflows::featurize::run(&table, &config, &featurizer, &reporter)?;

    ensure_parent_dir(&args.output)?;
    output
        .write_to_path(&args.output, config.data.delimiter)
        .map_err(EngineError::from)?;
    println!(
        "✓ {} compound row(s) with {} column(s) written to: {}",
        output.len(),
        output.headers().len(),
        args.output.display()
    );
    Ok(())
}

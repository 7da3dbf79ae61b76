use super::{build_featurizer, ensure_parent_dir};
use crate::cli::EvaluateArgs;
use crate::config::PartialConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use binstab::engine::error::EngineError;
use binstab::engine::pipeline;
use binstab::engine::progress::ProgressReporter;
use binstab::workflows;
use tracing::info;

pub fn run(args: EvaluateArgs) -> Result<()> {
    let partial_config = PartialConfig::load(args.common.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let (config, selection) = partial_config.merge_evaluate(&args)?;
    let featurizer = build_featurizer(&selection)?;

    let table = pipeline::load_table(&args.common.input, &config.data)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Evaluating {} model(s) with {}-fold grouped cross-validation...",
        config.candidates.len(),
        config.n_splits
    );
    let report = workflows::evaluate::run(&table, &config, &featurizer, &reporter)?;

    ensure_parent_dir(&args.output)?;
    report
        .write_csv(&args.output, config.data.delimiter)
        .map_err(EngineError::from)?;

    for model in &report.models {
        let summary = &model.result.summary;
        println!(
            "  {:<24} accuracy {:.3} ± {:.3}   F1 {:.3} ± {:.3}",
            model.name,
            summary.accuracy.mean,
            summary.accuracy.std,
            summary.f1.mean,
            summary.f1.std
        );
    }
    println!("✓ Metrics written to: {}", args.output.display());
    Ok(())
}

use crate::core::features::featurizer::Featurizer;
use crate::core::io::table::{RecordTable, TableError};
use crate::core::learn::spec::CandidateModel;
use crate::core::models::ids::GroupId;
use crate::engine::config::EvaluationConfig;
use crate::engine::error::EngineError;
use crate::engine::pipeline;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::validation::cross_validate::{CrossValidation, cross_validate};
use crate::engine::validation::group_kfold::GroupKFold;
use crate::engine::validation::metrics::MetricSummary;
use nalgebra::DMatrix;
use std::path::Path;
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub const REPORT_COLUMNS: [&str; 9] = [
    "model",
    "accuracy",
    "accuracy_std",
    "f1",
    "f1_std",
    "recall",
    "recall_std",
    "precision",
    "precision_std",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ModelEvaluation {
    pub name: String,
    pub kind: &'static str,
    pub result: CrossValidation,
}

/// Cross-validation results of every candidate, in candidate order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationReport {
    pub models: Vec<ModelEvaluation>,
}

impl EvaluationReport {
    pub fn get(&self, name: &str) -> Option<&ModelEvaluation> {
        self.models.iter().find(|m| m.name == name)
    }

    /// The report as a table, one row per model with mean and standard deviation of
    /// each metric.
    pub fn to_table(&self) -> RecordTable {
        let fmt = |s: &MetricSummary| [s.mean.to_string(), s.std.to_string()];
        let rows = self
            .models
            .iter()
            .map(|m| {
                let summary = &m.result.summary;
                let mut row = vec![m.name.clone()];
                for metric in [
                    &summary.accuracy,
                    &summary.f1,
                    &summary.recall,
                    &summary.precision,
                ] {
                    row.extend(fmt(metric));
                }
                row
            })
            .collect();
        RecordTable::new(REPORT_COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
    }

    pub fn write_csv(&self, path: &Path, delimiter: u8) -> Result<(), TableError> {
        self.to_table().write_to_path(path, delimiter)
    }
}

fn evaluate_candidate(
    candidate: &CandidateModel,
    features: &DMatrix<f64>,
    labels: &[u8],
    groups: &[GroupId],
    kfold: &GroupKFold,
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<ModelEvaluation, EngineError> {
    let oversample_seed = config.oversample.then_some(config.seed);
    let result = cross_validate(candidate, features, labels, groups, kfold, oversample_seed)?;
    info!(
        model = %candidate.name,
        accuracy = result.summary.accuracy.mean,
        f1 = result.summary.f1.mean,
        "Evaluated candidate"
    );
    reporter.report(Progress::TaskIncrement);
    Ok(ModelEvaluation {
        name: candidate.name.clone(),
        kind: candidate.spec.kind(),
        result,
    })
}

#[instrument(skip_all, name = "evaluation_workflow")]
pub fn run(
    table: &RecordTable,
    config: &EvaluationConfig,
    featurizer: &dyn Featurizer,
    reporter: &ProgressReporter,
) -> Result<EvaluationReport, EngineError> {
    let prepared = pipeline::prepare(
        table,
        &config.data,
        &config.conversion,
        featurizer,
        reporter,
    )?;
    let labels = prepared.labels("evaluate")?;
    let groups = prepared.compounds.groups();
    let features = prepared.features.values();
    let kfold = GroupKFold::new(config.n_splits)?;

    reporter.report(Progress::PhaseStart {
        name: "Cross-validation",
    });
    reporter.report(Progress::TaskStart {
        total_steps: config.candidates.len() as u64,
    });
    info!(
        models = config.candidates.len(),
        folds = config.n_splits,
        workers = config.workers,
        "Evaluating candidate models"
    );

    let evaluate = |candidate: &CandidateModel| {
        evaluate_candidate(
            candidate, features, &labels, &groups, &kfold, config, reporter,
        )
    };

    #[cfg(feature = "parallel")]
    let models = {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
        pool.install(|| {
            config
                .candidates
                .par_iter()
                .map(evaluate)
                .collect::<Result<Vec<_>, _>>()
        })?
    };

    #[cfg(not(feature = "parallel"))]
    let models = config
        .candidates
        .iter()
        .map(evaluate)
        .collect::<Result<Vec<_>, _>>()?;

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!("Evaluation complete.");
    Ok(EvaluationReport { models })
}

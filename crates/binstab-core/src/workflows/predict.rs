use crate::core::features::featurizer::Featurizer;
use crate::core::io::table::RecordTable;
use crate::core::learn::artifact::ModelArtifact;
use crate::engine::config::PredictionConfig;
use crate::engine::error::EngineError;
use crate::engine::pipeline;
use crate::engine::progress::ProgressReporter;
use crate::engine::stability::to_stability_vectors;
use crate::engine::validation::metrics::FoldScores;
use tracing::{info, instrument};

/// Applies `artifact` to `table` and returns the table with a stability-vector
/// column appended.
///
/// Rows removed during conversion (noble-gas systems) are not part of the output;
/// the remaining rows keep their original order.
#[instrument(skip_all, name = "prediction_workflow", fields(model = %artifact.name))]
pub fn run(
    table: &RecordTable,
    artifact: &ModelArtifact,
    config: &PredictionConfig,
    featurizer: &dyn Featurizer,
    reporter: &ProgressReporter,
) -> Result<RecordTable, EngineError> {
    let prepared = pipeline::prepare(
        table,
        &config.data,
        &config.conversion,
        featurizer,
        reporter,
    )?;
    if prepared.compounds.is_empty() {
        return Err(EngineError::NoData { purpose: "predict" });
    }

    let predictions = reporter.phase("Predicting", || {
        artifact.predict(prepared.features.labels(), prepared.features.values())
    })?;

    if let Some(truth) = prepared.compounds.labels() {
        let scores = FoldScores::compute(&truth, &predictions);
        info!(
            accuracy = scores.accuracy,
            f1 = scores.f1,
            "Input carries stability labels; scored predictions against them"
        );
    }

    let vectors = to_stability_vectors(&predictions)?;
    let output = prepared
        .table
        .select_rows(&prepared.compounds.source_rows())
        .with_column(
            &config.output_column,
            vectors.iter().map(|v| v.to_string()).collect(),
        )?;
    info!(rows = output.len(), "Predictions complete");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::learn::spec::{CandidateModel, ClassifierSpec};
    use crate::core::learn::tree::DecisionTreeParams;
    use crate::engine::config::{
        DataConfig, FeatureSetConfig, PredictionConfigBuilder, TrainConfigBuilder,
    };
    use crate::engine::progress::ProgressReporter;
    use crate::workflows::train;

    fn training_table() -> RecordTable {
        RecordTable::read_from(
            "element_a,element_b,stability\n\
             Fe,O,\"[1, 0]\"\nNa,Cl,\"[0, 1]\"\nAl,Ni,\"[1, 1]\"\nCu,Zn,\"[0, 0]\"\n"
                .as_bytes(),
            b',',
        )
        .unwrap()
    }

    fn trained() -> ModelArtifact {
        let config = TrainConfigBuilder::new()
            .data(DataConfig::default())
            .oversample(false)
            .candidate(CandidateModel::new(
                "tree",
                ClassifierSpec::DecisionTree(DecisionTreeParams::default()),
            ))
            .build()
            .unwrap();
        let featurizer = FeatureSetConfig::default().build(None).unwrap();
        train::run(&training_table(), &config, &featurizer, &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn predictions_reproduce_training_labels_and_drop_noble_gases() {
        let input = RecordTable::read_from(
            "id,element_a,element_b\n1,Fe,O\n2,Xe,F\n3,Cu,Zn\n".as_bytes(),
            b',',
        )
        .unwrap();
        let config = PredictionConfigBuilder::new()
            .data(DataConfig::default())
            .build()
            .unwrap();
        let featurizer = FeatureSetConfig::default().build(None).unwrap();
        let output = run(&input, &trained(), &config, &featurizer, &ProgressReporter::new()).unwrap();

        assert_eq!(
            output.headers(),
            ["id", "element_a", "element_b", "predicted_stability"]
        );
        assert_eq!(output.len(), 2);
        assert_eq!(output.rows()[0], ["1", "Fe", "O", "[1, 0]"]);
        assert_eq!(output.rows()[1], ["3", "Cu", "Zn", "[0, 0]"]);
    }

    #[test]
    fn mismatched_feature_set_is_rejected() {
        let input = RecordTable::read_from("element_a,element_b\nFe,O\n".as_bytes(), b',').unwrap();
        let config = PredictionConfigBuilder::new()
            .data(DataConfig::default())
            .build()
            .unwrap();
        let featurizer = FeatureSetConfig {
            element_property: None,
            ..Default::default()
        }
        .build(None)
        .unwrap();
        let result = run(&input, &trained(), &config, &featurizer, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::Artifact { .. })));
    }
}

use crate::core::features::featurizer::Featurizer;
use crate::core::io::table::RecordTable;
use crate::core::learn::artifact::ModelArtifact;
use crate::engine::config::TrainConfig;
use crate::engine::error::EngineError;
use crate::engine::pipeline;
use crate::engine::progress::ProgressReporter;
use crate::engine::validation::oversample::RandomOverSampler;
use tracing::{info, instrument};

/// Fits the configured candidate on every labelled compound of `table`.
#[instrument(skip_all, name = "train_workflow", fields(model = %config.candidate.name))]
pub fn run(
    table: &RecordTable,
    config: &TrainConfig,
    featurizer: &dyn Featurizer,
    reporter: &ProgressReporter,
) -> Result<ModelArtifact, EngineError> {
    let prepared = pipeline::prepare(
        table,
        &config.data,
        &config.conversion,
        featurizer,
        reporter,
    )?;
    let labels = prepared.labels("train")?;
    let features = prepared.features.values();

    let candidate = &config.candidate;
    let classifier = reporter.phase("Fitting model", || {
        let fitted = if config.oversample {
            let (x, y) = RandomOverSampler::new(config.seed).resample(features, &labels);
            candidate.spec.fit(&x, &y)
        } else {
            candidate.spec.fit(features, &labels)
        };
        fitted.map_err(|source| EngineError::Model {
            model: candidate.name.clone(),
            source,
        })
    })?;

    info!(
        samples = labels.len(),
        features = features.ncols(),
        kind = candidate.spec.kind(),
        "Model trained"
    );
    Ok(ModelArtifact::new(
        candidate.name.clone(),
        candidate.spec.clone(),
        prepared.features.labels().to_vec(),
        classifier,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::learn::spec::{CandidateModel, ClassifierSpec};
    use crate::core::learn::traits::Classifier;
    use crate::engine::config::{DataConfig, FeatureSetConfig, TrainConfigBuilder};

    fn table() -> RecordTable {
        RecordTable::read_from(
            "element_a,element_b,stability\nFe,O,\"[1, 0]\"\nNa,Cl,\"[0, 1]\"\nAl,Ni,\"[1, 1]\"\n"
                .as_bytes(),
            b',',
        )
        .unwrap()
    }

    #[test]
    fn artifact_records_feature_labels_and_candidate() {
        let candidate = CandidateModel::new(
            "nb",
            ClassifierSpec::GaussianNaiveBayes(Default::default()),
        );
        let config = TrainConfigBuilder::new()
            .data(DataConfig::default())
            .candidate(candidate.clone())
            .build()
            .unwrap();
        let featurizer = FeatureSetConfig::default().build(None).unwrap();
        let artifact = run(&table(), &config, &featurizer, &ProgressReporter::new()).unwrap();

        assert_eq!(artifact.name, "nb");
        assert_eq!(artifact.spec, candidate.spec);
        assert_eq!(artifact.feature_labels, featurizer.feature_labels());
        assert_eq!(artifact.classifier.n_features(), artifact.feature_labels.len());
    }

    #[test]
    fn empty_table_cannot_be_trained_on() {
        let empty = RecordTable::new(
            vec!["element_a".into(), "element_b".into(), "stability".into()],
            Vec::new(),
        );
        let config = TrainConfigBuilder::new()
            .data(DataConfig::default())
            .candidate(CandidateModel::new(
                "tree",
                ClassifierSpec::DecisionTree(Default::default()),
            ))
            .build()
            .unwrap();
        let featurizer = FeatureSetConfig::default().build(None).unwrap();
        let result = run(&empty, &config, &featurizer, &ProgressReporter::new());
        assert!(matches!(result, Err(EngineError::NoData { purpose: "train" })));
    }
}

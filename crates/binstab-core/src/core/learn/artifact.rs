use super::LearnError;
use super::spec::{ClassifierSpec, FittedClassifier};
use super::traits::Classifier;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error for '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("Unsupported model artifact version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[error(
        "Feature mismatch: model '{model}' was trained on {expected} features but the input has {found}{detail}"
    )]
    FeatureMismatch {
        model: String,
        expected: usize,
        found: usize,
        detail: String,
    },
    #[error("Prediction failed: {0}")]
    Learn(#[from] LearnError),
}

/// A fitted classifier together with everything needed to apply it to new data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub name: String,
    pub spec: ClassifierSpec,
    /// Ordered labels of the feature columns the model was trained on.
    pub feature_labels: Vec<String>,
    pub classifier: FittedClassifier,
}

impl ModelArtifact {
    pub fn new(
        name: impl Into<String>,
        spec: ClassifierSpec,
        feature_labels: Vec<String>,
        classifier: FittedClassifier,
    ) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            name: name.into(),
            spec,
            feature_labels,
            classifier,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let path_str = path.to_string_lossy().to_string();
        let file = File::create(path).map_err(|e| ArtifactError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            ArtifactError::Json {
                path: path_str,
                source: e,
            }
        })
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let path_str = path.to_string_lossy().to_string();
        let file = File::open(path).map_err(|e| ArtifactError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        let artifact: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| ArtifactError::Json {
                path: path_str,
                source: e,
            })?;
        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::Version {
                found: artifact.format_version,
                expected: ARTIFACT_FORMAT_VERSION,
            });
        }
        Ok(artifact)
    }

    /// Fails unless `labels` are exactly the labels the model was trained on.
    pub fn check_features(&self, labels: &[String]) -> Result<(), ArtifactError> {
        if labels == self.feature_labels.as_slice() {
            return Ok(());
        }
        let detail = self
            .feature_labels
            .iter()
            .zip(labels)
            .position(|(a, b)| a != b)
            .map(|i| {
                format!(
                    "; column {} is '{}' instead of '{}'",
                    i, labels[i], self.feature_labels[i]
                )
            })
            .unwrap_or_default();
        Err(ArtifactError::FeatureMismatch {
            model: self.name.clone(),
            expected: self.feature_labels.len(),
            found: labels.len(),
            detail,
        })
    }

    pub fn predict(&self, labels: &[String], features: &DMatrix<f64>) -> Result<Vec<u8>, ArtifactError> {
        self.check_features(labels)?;
        Ok(self.classifier.predict(features)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::learn::tree::DecisionTreeParams;
    use std::io::Write;
    use tempfile::tempdir;

    fn artifact() -> ModelArtifact {
        let x = DMatrix::from_row_slice(4, 2, &[0.0, 1.0, 0.1, 1.0, 5.0, 0.0, 5.1, 0.0]);
        let spec = ClassifierSpec::DecisionTree(DecisionTreeParams::default());
        let classifier = spec.fit(&x, &[0, 0, 1, 1]).unwrap();
        ModelArtifact::new("tree", spec, vec!["a".into(), "b".into()], classifier)
    }

    #[test]
    fn save_then_load_preserves_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let original = artifact();
        original.save(&path).unwrap();
        assert_eq!(ModelArtifact::load(&path).unwrap(), original);
    }

    #[test]
    fn load_rejects_unknown_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut stale = artifact();
        stale.format_version = 99;
        stale.save(&path).unwrap();
        assert!(matches!(
            ModelArtifact::load(&path),
            Err(ArtifactError::Version { found: 99, expected: 1 })
        ));
    }

    #[test]
    fn load_reports_malformed_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        File::create(&path).unwrap().write_all(b"{ not json").unwrap();
        assert!(matches!(ModelArtifact::load(&path), Err(ArtifactError::Json { .. })));
    }

    #[test]
    fn predict_checks_feature_labels() {
        let model = artifact();
        let x = DMatrix::from_row_slice(1, 2, &[5.0, 0.0]);
        assert_eq!(model.predict(&["a".into(), "b".into()], &x).unwrap(), vec![1]);

        let err = model.predict(&["a".into(), "c".into()], &x).unwrap_err();
        assert!(matches!(err, ArtifactError::FeatureMismatch { expected: 2, found: 2, .. }));
        assert!(err.to_string().contains("column 1 is 'c' instead of 'b'"));
    }
}

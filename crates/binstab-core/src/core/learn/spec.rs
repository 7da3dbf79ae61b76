use super::LearnError;
use super::forest::{RandomForest, RandomForestParams};
use super::logistic::{LogisticRegression, LogisticRegressionParams};
use super::naive_bayes::{GaussianNaiveBayes, GaussianNaiveBayesParams};
use super::neighbors::{KNearestNeighbors, KNearestNeighborsParams};
use super::traits::Classifier;
use super::tree::{DecisionTree, DecisionTreeParams};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Hyper-parameters of one classifier family, tagged by `type`.
///
/// ```toml
/// type = "random-forest"
/// n-estimators = 200
/// seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClassifierSpec {
    LogisticRegression(LogisticRegressionParams),
    KNearestNeighbors(KNearestNeighborsParams),
    GaussianNaiveBayes(GaussianNaiveBayesParams),
    DecisionTree(DecisionTreeParams),
    RandomForest(RandomForestParams),
}

impl ClassifierSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic-regression",
            Self::KNearestNeighbors(_) => "k-nearest-neighbors",
            Self::GaussianNaiveBayes(_) => "gaussian-naive-bayes",
            Self::DecisionTree(_) => "decision-tree",
            Self::RandomForest(_) => "random-forest",
        }
    }

    pub fn fit(&self, features: &DMatrix<f64>, labels: &[u8]) -> Result<FittedClassifier, LearnError> {
        Ok(match self {
            Self::LogisticRegression(p) => FittedClassifier::LogisticRegression(p.fit(features, labels)?),
            Self::KNearestNeighbors(p) => FittedClassifier::KNearestNeighbors(p.fit(features, labels)?),
            Self::GaussianNaiveBayes(p) => FittedClassifier::GaussianNaiveBayes(p.fit(features, labels)?),
            Self::DecisionTree(p) => FittedClassifier::DecisionTree(p.fit(features, labels)?),
            Self::RandomForest(p) => FittedClassifier::RandomForest(p.fit(features, labels)?),
        })
    }
}

/// A fitted model of any supported family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "model", rename_all = "kebab-case")]
pub enum FittedClassifier {
    LogisticRegression(LogisticRegression),
    KNearestNeighbors(KNearestNeighbors),
    GaussianNaiveBayes(GaussianNaiveBayes),
    DecisionTree(DecisionTree),
    RandomForest(RandomForest),
}

impl FittedClassifier {
    fn inner(&self) -> &dyn Classifier {
        match self {
            Self::LogisticRegression(m) => m,
            Self::KNearestNeighbors(m) => m,
            Self::GaussianNaiveBayes(m) => m,
            Self::DecisionTree(m) => m,
            Self::RandomForest(m) => m,
        }
    }
}

impl Classifier for FittedClassifier {
    fn predict(&self, features: &DMatrix<f64>) -> Result<Vec<u8>, LearnError> {
        self.inner().predict(features)
    }

    fn n_features(&self) -> usize {
        self.inner().n_features()
    }
}

/// A named classifier configuration taking part in evaluation or training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateModel {
    pub name: String,
    #[serde(flatten)]
    pub spec: ClassifierSpec,
}

impl CandidateModel {
    pub fn new(name: impl Into<String>, spec: ClassifierSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }
}

/// One candidate per classifier family with default hyper-parameters, each named
/// after its family.
pub fn default_candidates() -> Vec<CandidateModel> {
    [
        ClassifierSpec::LogisticRegression(Default::default()),
        ClassifierSpec::KNearestNeighbors(Default::default()),
        ClassifierSpec::GaussianNaiveBayes(Default::default()),
        ClassifierSpec::DecisionTree(Default::default()),
        ClassifierSpec::RandomForest(Default::default()),
    ]
    .into_iter()
    .map(|spec| CandidateModel::new(spec.kind(), spec))
    .collect()
}

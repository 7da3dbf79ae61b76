use super::group_kfold::GroupKFold;
use super::metrics::{FoldScores, ScoreSummary};
use super::oversample::RandomOverSampler;
use crate::core::learn::spec::CandidateModel;
use crate::core::learn::traits::Classifier;
use crate::core::models::ids::GroupId;
use crate::engine::error::EngineError;
use nalgebra::DMatrix;
use tracing::{debug, instrument};

/// Per-fold scores of one candidate and their summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossValidation {
    pub folds: Vec<FoldScores>,
    pub summary: ScoreSummary,
}

/// Fits and scores `candidate` on every fold of a grouped split.
///
/// When `oversample_seed` is set, the training partition of fold `k` is balanced
/// with a [`RandomOverSampler`] seeded with `seed + k`; test partitions are never
/// resampled.
#[instrument(skip_all, fields(model = %candidate.name))]
pub fn cross_validate(
    candidate: &CandidateModel,
    features: &DMatrix<f64>,
    labels: &[u8],
    groups: &[GroupId],
    kfold: &GroupKFold,
    oversample_seed: Option<u64>,
) -> Result<CrossValidation, EngineError> {
    if features.nrows() != labels.len() || labels.len() != groups.len() {
        return Err(EngineError::Internal(format!(
            "cross-validation inputs disagree: {} feature rows, {} labels, {} groups",
            features.nrows(),
            labels.len(),
            groups.len()
        )));
    }
    let model_error = |source| EngineError::Model {
        model: candidate.name.clone(),
        source,
    };

    let mut folds = Vec::with_capacity(kfold.n_splits());
    for (k, fold) in kfold.split(groups)?.into_iter().enumerate() {
        let train_x = features.select_rows(&fold.train);
        let train_y: Vec<u8> = fold.train.iter().map(|&i| labels[i]).collect();
        let (train_x, train_y) = match oversample_seed {
            Some(seed) => {
                RandomOverSampler::new(seed.wrapping_add(k as u64)).resample(&train_x, &train_y)
            }
            None => (train_x, train_y),
        };

        let model = candidate.spec.fit(&train_x, &train_y).map_err(model_error)?;
        let test_y: Vec<u8> = fold.test.iter().map(|&i| labels[i]).collect();
        let predicted = model
            .predict(&features.select_rows(&fold.test))
            .map_err(model_error)?;

        let scores = FoldScores::compute(&test_y, &predicted);
        debug!(
            fold = k,
            train = train_y.len(),
            test = test_y.len(),
            accuracy = scores.accuracy,
            "Scored fold"
        );
        folds.push(scores);
    }

    Ok(CrossValidation {
        summary: ScoreSummary::of(&folds),
        folds,
    })
}

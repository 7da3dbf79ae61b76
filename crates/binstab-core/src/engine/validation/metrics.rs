use serde::{Deserialize, Serialize};
use tracing::warn;

/// Confusion counts for a binary problem with positive class 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionCounts {
    pub true_positive: usize,
    pub false_positive: usize,
    pub true_negative: usize,
    pub false_negative: usize,
}

impl ConfusionCounts {
    pub fn from_predictions(truth: &[u8], predicted: &[u8]) -> Self {
        let mut counts = Self::default();
        for (&t, &p) in truth.iter().zip(predicted) {
            match (t == 1, p == 1) {
                (true, true) => counts.true_positive += 1,
                (false, true) => counts.false_positive += 1,
                (false, false) => counts.true_negative += 1,
                (true, false) => counts.false_negative += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }
}

/// Ratio that falls back to 0 (with a warning) when the denominator is zero.
fn ratio(numerator: usize, denominator: usize, metric: &'static str) -> f64 {
    if denominator == 0 {
        warn!(metric, "Metric is ill-defined (zero denominator); reporting 0.0");
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

/// Scores of one model on one held-out fold.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FoldScores {
    pub accuracy: f64,
    pub f1: f64,
    pub recall: f64,
    pub precision: f64,
}

impl FoldScores {
    pub fn compute(truth: &[u8], predicted: &[u8]) -> Self {
        let c = ConfusionCounts::from_predictions(truth, predicted);
        let accuracy = ratio(c.true_positive + c.true_negative, c.total(), "accuracy");
        let precision = ratio(c.true_positive, c.true_positive + c.false_positive, "precision");
        let recall = ratio(c.true_positive, c.true_positive + c.false_negative, "recall");
        let f1 = ratio(
            2 * c.true_positive,
            2 * c.true_positive + c.false_positive + c.false_negative,
            "f1",
        );
        Self {
            accuracy,
            f1,
            recall,
            precision,
        }
    }
}

/// Mean and population standard deviation of a metric across folds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSummary {
    pub mean: f64,
    pub std: f64,
}

impl MetricSummary {
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: var.sqrt(),
        }
    }
}

/// Per-metric summaries of one model across all folds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub accuracy: MetricSummary,
    pub f1: MetricSummary,
    pub recall: MetricSummary,
    pub precision: MetricSummary,
}

impl ScoreSummary {
    pub fn of(folds: &[FoldScores]) -> Self {
        let collect = |f: fn(&FoldScores) -> f64| -> MetricSummary {
            MetricSummary::of(&folds.iter().map(f).collect::<Vec<_>>())
        };
        Self {
            accuracy: collect(|s| s.accuracy),
            f1: collect(|s| s.f1),
            recall: collect(|s| s.recall),
            precision: collect(|s| s.precision),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn scores_match_hand_computed_confusion() {
        // tp = 2, fp = 1, tn = 1, fn = 1
        let truth = [1, 1, 0, 0, 1];
        let predicted = [1, 1, 1, 0, 0];
        let counts = ConfusionCounts::from_predictions(&truth, &predicted);
        assert_eq!(
            counts,
            ConfusionCounts {
                true_positive: 2,
                false_positive: 1,
                true_negative: 1,
                false_negative: 1
            }
        );

        let scores = FoldScores::compute(&truth, &predicted);
        assert!((scores.accuracy - 0.6).abs() < EPS);
        assert!((scores.precision - 2.0 / 3.0).abs() < EPS);
        assert!((scores.recall - 2.0 / 3.0).abs() < EPS);
        assert!((scores.f1 - 2.0 / 3.0).abs() < EPS);
    }

    #[test]
    fn ill_defined_metrics_are_zero() {
        let scores = FoldScores::compute(&[0, 0, 0], &[0, 0, 0]);
        assert_eq!(scores.accuracy, 1.0);
        assert_eq!(scores.precision, 0.0);
        assert_eq!(scores.recall, 0.0);
        assert_eq!(scores.f1, 0.0);
    }

    #[test]
    fn summary_uses_population_standard_deviation() {
        let summary = MetricSummary::of(&[0.5, 1.0]);
        assert!((summary.mean - 0.75).abs() < EPS);
        assert!((summary.std - 0.25).abs() < EPS);
        assert_eq!(MetricSummary::of(&[]), MetricSummary::default());
    }

    #[test]
    fn score_summary_aggregates_each_metric() {
        let folds = [
            FoldScores { accuracy: 1.0, f1: 0.0, recall: 0.5, precision: 0.2 },
            FoldScores { accuracy: 0.0, f1: 0.0, recall: 0.5, precision: 0.4 },
        ];
        let summary = ScoreSummary::of(&folds);
        assert_eq!(summary.accuracy, MetricSummary { mean: 0.5, std: 0.5 });
        assert_eq!(summary.recall.std, 0.0);
        assert!((summary.precision.mean - 0.3).abs() < EPS);
    }
}

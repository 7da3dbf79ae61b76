use super::traits::Classifier;
use super::{ClassCounts, LearnError, check_width, validate_training_set};
use nalgebra::DMatrix;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DecisionTreeParams {
    /// Maximum depth of the tree; unlimited when absent.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Number of randomly chosen features examined at each split; all when absent.
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for DecisionTreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum Node {
    Leaf {
        /// Fraction of class-1 training samples that reached this leaf.
        probability: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A CART classification tree grown with Gini impurity.
///
/// Nodes live in a flat arena; the root is node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    n_features: usize,
    nodes: Vec<Node>,
}

fn gini(n: usize, positive: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positive as f64 / n as f64;
    2.0 * p * (1.0 - p)
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct TreeBuilder<'a> {
    features: &'a DMatrix<f64>,
    labels: &'a [u8],
    params: &'a DecisionTreeParams,
    rng: StdRng,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let positive = samples.iter().filter(|&&i| self.labels[i] == 1).count();
        let n = samples.len();
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf {
            probability: positive as f64 / n as f64,
        });

        let depth_reached = self.params.max_depth.is_some_and(|max| depth >= max);
        let is_pure = positive == 0 || positive == n;
        if depth_reached
            || is_pure
            || n < self.params.min_samples_split
            || n < 2 * self.params.min_samples_leaf
        {
            return id;
        }

        let Some(best) = self.best_split(&samples, positive) else {
            return id;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.features[(i, best.feature)] <= best.threshold);
        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }

    fn candidate_features(&mut self) -> Vec<usize> {
        let d = self.features.ncols();
        match self.params.max_features {
            Some(m) if m < d => {
                let mut chosen = index::sample(&mut self.rng, d, m.max(1)).into_vec();
                chosen.sort_unstable();
                chosen
            }
            _ => (0..d).collect(),
        }
    }

    fn best_split(&mut self, samples: &[usize], positive: usize) -> Option<SplitCandidate> {
        let n = samples.len();
        let min_leaf = self.params.min_samples_leaf.max(1);
        let mut best: Option<SplitCandidate> = None;

        for feature in self.candidate_features() {
            let mut sorted = samples.to_vec();
            sorted.sort_by(|&a, &b| {
                self.features[(a, feature)].total_cmp(&self.features[(b, feature)])
            });

            let mut left_positive = 0;
            for k in 1..n {
                left_positive += usize::from(self.labels[sorted[k - 1]] == 1);
                if k < min_leaf || n - k < min_leaf {
                    continue;
                }
                let lo = self.features[(sorted[k - 1], feature)];
                let hi = self.features[(sorted[k], feature)];
                if lo == hi {
                    continue;
                }
                let impurity = (k as f64 * gini(k, left_positive)
                    + (n - k) as f64 * gini(n - k, positive - left_positive))
                    / n as f64;
                if best.as_ref().is_none_or(|b| impurity < b.impurity) {
                    best = Some(SplitCandidate {
                        feature,
                        threshold: lo + (hi - lo) / 2.0,
                        impurity,
                    });
                }
            }
        }
        best
    }
}

impl DecisionTreeParams {
    pub fn fit(&self, features: &DMatrix<f64>, labels: &[u8]) -> Result<DecisionTree, LearnError> {
        if self.min_samples_split < 2 {
            return Err(LearnError::InvalidHyperParameter {
                name: "min-samples-split",
                reason: format!("must be at least 2, got {}", self.min_samples_split),
            });
        }
        if self.max_features == Some(0) {
            return Err(LearnError::InvalidHyperParameter {
                name: "max-features",
                reason: "must be at least 1".to_string(),
            });
        }
        let counts: ClassCounts = validate_training_set(features, labels)?;
        let mut builder = TreeBuilder {
            features,
            labels,
            params: self,
            rng: StdRng::seed_from_u64(self.seed),
            nodes: Vec::new(),
        };
        builder.grow((0..counts.negative + counts.positive).collect(), 0);
        Ok(DecisionTree {
            n_features: features.ncols(),
            nodes: builder.nodes,
        })
    }
}

impl DecisionTree {
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        if self.nodes.is_empty() { 0 } else { walk(&self.nodes, 0) }
    }

    fn leaf_probability(&self, sample: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Leaf { probability }) => return *probability,
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    id = if sample[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => return 0.0,
            }
        }
    }

    /// Fraction of class-1 training samples in the leaf each row falls into.
    pub fn predict_proba(&self, features: &DMatrix<f64>) -> Result<Vec<f64>, LearnError> {
        check_width(features, self.n_features)?;
        Ok(features
            .row_iter()
            .map(|row| {
                let sample: Vec<f64> = row.iter().copied().collect();
                self.leaf_probability(&sample)
            })
            .collect())
    }
}

impl Classifier for DecisionTree {
    fn predict(&self, features: &DMatrix<f64>) -> Result<Vec<u8>, LearnError> {
        Ok(self
            .predict_proba(features)?
            .into_iter()
            .map(|p| u8::from(p > 0.5))
            .collect())
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xor() -> (DMatrix<f64>, Vec<u8>) {
        let x = DMatrix::from_row_slice(4, 2, &[0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 1.0, 1.0]);
        (x, vec![0, 1, 1, 0])
    }

    #[test]
    fn fits_training_data_exactly_without_depth_limit() {
        let (x, y) = xor();
        let tree = DecisionTreeParams::default().fit(&x, &y).unwrap();
        assert_eq!(tree.predict(&x).unwrap(), y);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn max_depth_limits_growth() {
        let (x, y) = xor();
        let params = DecisionTreeParams {
            max_depth: Some(1),
            ..Default::default()
        };
        assert_eq!(params.fit(&x, &y).unwrap().depth(), 1);
    }

    #[test]
    fn splits_on_informative_feature() {
        let x = DMatrix::from_row_slice(4, 2, &[9.0, 0.0, 1.0, 0.1, 9.0, 1.0, 1.0, 1.1]);
        let tree = DecisionTreeParams::default().fit(&x, &[0, 0, 1, 1]).unwrap();
        assert_eq!(tree.depth(), 1);
        let queries = DMatrix::from_row_slice(2, 2, &[5.0, 0.2, 5.0, 0.9]);
        assert_eq!(tree.predict(&queries).unwrap(), vec![0, 1]);
    }

    #[test]
    fn single_class_yields_constant_leaf() {
        let (x, _) = xor();
        let tree = DecisionTreeParams::default().fit(&x, &[0; 4]).unwrap();
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.predict(&x).unwrap(), vec![0; 4]);
    }

    #[test]
    fn seeded_feature_subsets_are_reproducible() {
        let x = DMatrix::from_fn(20, 5, |i, j| ((i * 7 + j * 3) % 11) as f64);
        let y: Vec<u8> = (0..20).map(|i| u8::from(i % 3 == 0)).collect();
        let params = DecisionTreeParams {
            max_features: Some(2),
            seed: 7,
            ..Default::default()
        };
        assert_eq!(params.fit(&x, &y).unwrap(), params.fit(&x, &y).unwrap());
    }
}

use crate::core::models::ids::GroupId;
use itertools::Itertools;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("Grouped k-fold needs at least 2 splits, got {0}")]
    TooFewSplits(usize),
    #[error("Cannot build {n_splits} folds from only {groups} distinct groups")]
    TooFewGroups { groups: usize, n_splits: usize },
}

/// Train and test row indices of one fold, both ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// k-fold splitter whose folds never separate rows sharing a group id.
///
/// Groups are placed largest first, ties broken by group id, each into the fold
/// currently holding the fewest rows (lowest fold index on ties). The result is
/// deterministic and balances fold sizes as far as the group sizes allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupKFold {
    n_splits: usize,
}

impl GroupKFold {
    pub fn new(n_splits: usize) -> Result<Self, SplitError> {
        if n_splits < 2 {
            return Err(SplitError::TooFewSplits(n_splits));
        }
        Ok(Self { n_splits })
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Fold index of every row.
    pub fn assign(&self, groups: &[GroupId]) -> Result<Vec<usize>, SplitError> {
        let sizes = groups.iter().copied().counts();
        if sizes.len() < self.n_splits {
            return Err(SplitError::TooFewGroups {
                groups: sizes.len(),
                n_splits: self.n_splits,
            });
        }

        let ordered = sizes
            .into_iter()
            .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut fold_sizes = vec![0usize; self.n_splits];
        let mut fold_of_group = HashMap::new();
        for (group, size) in ordered {
            let lightest = fold_sizes
                .iter()
                .enumerate()
                .min_by_key(|&(i, &n)| (n, i))
                .map_or(0, |(i, _)| i);
            fold_sizes[lightest] += size;
            fold_of_group.insert(group, lightest);
        }

        Ok(groups.iter().map(|g| fold_of_group[g]).collect())
    }

    pub fn split(&self, groups: &[GroupId]) -> Result<Vec<Fold>, SplitError> {
        let assignment = self.assign(groups)?;
        Ok((0..self.n_splits)
            .map(|fold| {
                let (test, train): (Vec<usize>, Vec<usize>) =
                    (0..groups.len()).partition(|&i| assignment[i] == fold);
                Fold { train, test }
            })
            .collect())
    }
}

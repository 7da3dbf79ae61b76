use super::FeatureError;
use super::featurizer::Featurizer;
use crate::core::chem::composition::Composition;

pub const DEFAULT_P_NORMS: [u32; 6] = [0, 2, 3, 5, 7, 10];

/// Stoichiometric attributes: p-norms of the atomic fractions.
///
/// `p = 0` counts the elements present; any other `p` yields
/// `(Σ xᵢᵖ)^(1/p)`, which shrinks as the composition becomes more evenly mixed.
#[derive(Debug, Clone, PartialEq)]
pub struct Stoichiometry {
    p_list: Vec<u32>,
}

impl Stoichiometry {
    pub fn new(p_list: Vec<u32>) -> Self {
        Self { p_list }
    }
}

impl Default for Stoichiometry {
    fn default() -> Self {
        Self::new(DEFAULT_P_NORMS.to_vec())
    }
}

impl Featurizer for Stoichiometry {
    fn name(&self) -> &'static str {
        "stoichiometry"
    }

    fn feature_labels(&self) -> Vec<String> {
        self.p_list.iter().map(|p| format!("{p}-norm")).collect()
    }

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, FeatureError> {
        if composition.is_empty() {
            return Err(FeatureError::EmptyComposition);
        }
        let fractions: Vec<f64> = composition.fractions().iter().map(|(_, x)| *x).collect();

        Ok(self
            .p_list
            .iter()
            .map(|&p| {
                if p == 0 {
                    fractions.iter().filter(|&&x| x > 0.0).count() as f64
                } else {
                    let p = p as f64;
                    fractions.iter().map(|x| x.powf(p)).sum::<f64>().powf(1.0 / p)
                }
            })
            .collect())
    }
}

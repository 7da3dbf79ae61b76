use super::FeatureError;
use crate::core::chem::composition::Composition;
use crate::core::models::compound::CompoundSet;
use crate::core::models::features::FeatureMatrix;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A mapping from a composition to a fixed-width vector of descriptors.
///
/// Implementations must return exactly one value per label in
/// [`Featurizer::feature_labels`], using `NaN` for values that are undefined for
/// the given composition.
pub trait Featurizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn feature_labels(&self) -> Vec<String>;

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, FeatureError>;
}

/// Concatenates the output of several featurizers in order.
#[derive(Default)]
pub struct MultipleFeaturizer {
    featurizers: Vec<Box<dyn Featurizer>>,
}

impl MultipleFeaturizer {
    pub fn new(featurizers: Vec<Box<dyn Featurizer>>) -> Self {
        Self { featurizers }
    }

    pub fn push(&mut self, featurizer: Box<dyn Featurizer>) {
        self.featurizers.push(featurizer);
    }

    pub fn len(&self) -> usize {
        self.featurizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.featurizers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.featurizers.iter().map(|f| f.name()).collect()
    }
}

impl Featurizer for MultipleFeaturizer {
    fn name(&self) -> &'static str {
        "multiple"
    }

    fn feature_labels(&self) -> Vec<String> {
        self.featurizers
            .iter()
            .flat_map(|f| f.feature_labels())
            .collect()
    }

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, FeatureError> {
        let mut values = Vec::new();
        for featurizer in &self.featurizers {
            let expected = featurizer.feature_labels().len();
            let chunk = featurizer.featurize(composition)?;
            if chunk.len() != expected {
                return Err(FeatureError::WidthMismatch {
                    name: featurizer.name(),
                    expected,
                    found: chunk.len(),
                });
            }
            values.extend(chunk);
        }
        Ok(values)
    }
}

/// Builds the feature matrix of a compound set.
///
/// Each row holds the featurizer output followed by the compound's pre-supplied
/// features (missing values become `NaN`). Once all rows are assembled every
/// undefined entry is replaced by zero.
#[instrument(skip_all, name = "featurize_compounds")]
pub fn featurize_compounds(
    featurizer: &dyn Featurizer,
    compounds: &CompoundSet,
    extra_labels: &[String],
) -> Result<FeatureMatrix, FeatureError> {
    let mut labels = featurizer.feature_labels();
    let computed_width = labels.len();
    labels.extend(extra_labels.iter().cloned());

    #[cfg(not(feature = "parallel"))]
    let iterator = compounds.rows().iter().enumerate();

    #[cfg(feature = "parallel")]
    let iterator = compounds.rows().par_iter().enumerate();

    let rows: Vec<Vec<f64>> = iterator
        .map(|(index, compound)| {
            if compound.extra_features.len() != extra_labels.len() {
                return Err(FeatureError::ExtraFeatureWidth {
                    row: index,
                    expected: extra_labels.len(),
                    found: compound.extra_features.len(),
                });
            }
            let mut row = featurizer.featurize(&compound.composition)?;
            if row.len() != computed_width {
                return Err(FeatureError::WidthMismatch {
                    name: featurizer.name(),
                    expected: computed_width,
                    found: row.len(),
                });
            }
            row.extend(
                compound
                    .extra_features
                    .iter()
                    .map(|value| value.unwrap_or(f64::NAN)),
            );
            Ok(row)
        })
        .collect::<Result<_, _>>()?;

    let width = labels.len();
    let mut matrix =
        FeatureMatrix::from_rows(labels, &rows).ok_or(FeatureError::WidthMismatch {
            name: featurizer.name(),
            expected: width,
            found: rows.first().map_or(0, Vec::len),
        })?;

    let replaced = matrix.zero_fill_undefined();
    debug!(
        rows = matrix.nrows(),
        columns = matrix.ncols(),
        replaced,
        "Assembled feature matrix"
    );
    Ok(matrix)
}

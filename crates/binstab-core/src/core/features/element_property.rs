use super::FeatureError;
use super::featurizer::Featurizer;
use crate::core::chem::composition::Composition;
use crate::core::chem::elements::Element;
use serde::{Deserialize, Serialize};

/// An elemental property that can be aggregated over a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementalProperty {
    Number,
    AtomicWeight,
    Row,
    Column,
    MeltingT,
    CovalentRadius,
    Electronegativity,
    NsValence,
    NpValence,
    NdValence,
    NfValence,
    NValence,
    NsUnfilled,
    NpUnfilled,
    NdUnfilled,
    NfUnfilled,
    NUnfilled,
}

impl ElementalProperty {
    /// The default property preset, modelled on the Magpie elemental attributes.
    pub const PRESET: [Self; 17] = [
        Self::Number,
        Self::AtomicWeight,
        Self::Row,
        Self::Column,
        Self::MeltingT,
        Self::CovalentRadius,
        Self::Electronegativity,
        Self::NsValence,
        Self::NpValence,
        Self::NdValence,
        Self::NfValence,
        Self::NValence,
        Self::NsUnfilled,
        Self::NpUnfilled,
        Self::NdUnfilled,
        Self::NfUnfilled,
        Self::NUnfilled,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::AtomicWeight => "AtomicWeight",
            Self::Row => "Row",
            Self::Column => "Column",
            Self::MeltingT => "MeltingT",
            Self::CovalentRadius => "CovalentRadius",
            Self::Electronegativity => "Electronegativity",
            Self::NsValence => "NsValence",
            Self::NpValence => "NpValence",
            Self::NdValence => "NdValence",
            Self::NfValence => "NfValence",
            Self::NValence => "NValence",
            Self::NsUnfilled => "NsUnfilled",
            Self::NpUnfilled => "NpUnfilled",
            Self::NdUnfilled => "NdUnfilled",
            Self::NfUnfilled => "NfUnfilled",
            Self::NUnfilled => "NUnfilled",
        }
    }

    /// Value of the property for `element`, or `NaN` when it is undefined.
    pub fn value(&self, element: Element) -> f64 {
        let data = element.data();
        let shells = element.valence_shells();
        let unfilled = shells.unfilled();
        match self {
            Self::Number => element.atomic_number() as f64,
            Self::AtomicWeight => data.atomic_mass,
            Self::Row => element.row() as f64,
            Self::Column => element.column() as f64,
            Self::MeltingT => data.melting_point,
            Self::CovalentRadius => data.covalent_radius,
            Self::Electronegativity => data.electronegativity.unwrap_or(f64::NAN),
            Self::NsValence => shells.s as f64,
            Self::NpValence => shells.p as f64,
            Self::NdValence => shells.d as f64,
            Self::NfValence => shells.f as f64,
            Self::NValence => shells.total() as f64,
            Self::NsUnfilled => unfilled[0] as f64,
            Self::NpUnfilled => unfilled[1] as f64,
            Self::NdUnfilled => unfilled[2] as f64,
            Self::NfUnfilled => unfilled[3] as f64,
            Self::NUnfilled => shells.total_unfilled() as f64,
        }
    }
}

/// A fraction-weighted statistic over the elements of a composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statistic {
    Minimum,
    Maximum,
    Range,
    Mean,
    AvgDev,
    Mode,
}

impl Statistic {
    pub const ALL: [Self; 6] = [
        Self::Minimum,
        Self::Maximum,
        Self::Range,
        Self::Mean,
        Self::AvgDev,
        Self::Mode,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::Range => "range",
            Self::Mean => "mean",
            Self::AvgDev => "avg_dev",
            Self::Mode => "mode",
        }
    }

    /// Computes the statistic of `values` weighted by `weights` (atomic fractions
    /// summing to one). Any undefined value makes the statistic undefined.
    pub fn compute(&self, values: &[f64], weights: &[f64]) -> f64 {
        if values.is_empty() || values.iter().any(|v| v.is_nan()) {
            return f64::NAN;
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = || values.iter().zip(weights).map(|(v, w)| v * w).sum::<f64>();

        match self {
            Self::Minimum => min,
            Self::Maximum => max,
            Self::Range => max - min,
            Self::Mean => mean(),
            Self::AvgDev => {
                let mean = mean();
                values
                    .iter()
                    .zip(weights)
                    .map(|(v, w)| w * (v - mean).abs())
                    .sum()
            }
            Self::Mode => {
                // Value of the most abundant element; ties resolve to the smallest value.
                let top = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                values
                    .iter()
                    .zip(weights)
                    .filter(|(_, w)| **w == top)
                    .map(|(v, _)| *v)
                    .fold(f64::INFINITY, f64::min)
            }
        }
    }
}

/// Statistics of elemental properties over a composition, weighted by atomic fraction.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementProperty {
    properties: Vec<ElementalProperty>,
    stats: Vec<Statistic>,
}

impl ElementProperty {
    pub fn new(properties: Vec<ElementalProperty>, stats: Vec<Statistic>) -> Self {
        Self { properties, stats }
    }
}

impl Default for ElementProperty {
    fn default() -> Self {
        Self::new(ElementalProperty::PRESET.to_vec(), Statistic::ALL.to_vec())
    }
}

impl Featurizer for ElementProperty {
    fn name(&self) -> &'static str {
        "element-property"
    }

    fn feature_labels(&self) -> Vec<String> {
        self.properties
            .iter()
            .flat_map(|prop| {
                self.stats
                    .iter()
                    .map(move |stat| format!("{} {}", stat.name(), prop.name()))
            })
            .collect()
    }

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, FeatureError> {
        if composition.is_empty() {
            return Err(FeatureError::EmptyComposition);
        }
        let (elements, weights): (Vec<Element>, Vec<f64>) =
            composition.fractions().into_iter().unzip();

        let mut features = Vec::with_capacity(self.properties.len() * self.stats.len());
        for prop in &self.properties {
            let values: Vec<f64> = elements.iter().map(|&el| prop.value(el)).collect();
            for stat in &self.stats {
                features.push(stat.compute(&values, &weights));
            }
        }
        Ok(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn featurize_one(prop: ElementalProperty, formula: &str) -> Vec<f64> {
        let comp: Composition = formula.parse().unwrap();
        ElementProperty::new(vec![prop], Statistic::ALL.to_vec())
            .featurize(&comp)
            .unwrap()
    }

    #[test]
    fn labels_enumerate_stats_within_each_property() {
        let featurizer = ElementProperty::new(
            vec![ElementalProperty::Number, ElementalProperty::Row],
            vec![Statistic::Mean, Statistic::Range],
        );
        assert_eq!(
            featurizer.feature_labels(),
            vec!["mean Number", "range Number", "mean Row", "range Row"]
        );
        assert_eq!(ElementProperty::default().feature_labels().len(), 17 * 6);
    }

    #[test]
    fn weighted_statistics_of_atomic_number() {
        // Fe2O3: Fe (26) with x = 0.4, O (8) with x = 0.6.
        let values = featurize_one(ElementalProperty::Number, "Fe2O3");
        let mean = 0.4 * 26.0 + 0.6 * 8.0;
        let avg_dev = 0.4 * (26.0 - mean) + 0.6 * (mean - 8.0);
        assert_eq!(values[0], 8.0);
        assert_eq!(values[1], 26.0);
        assert_eq!(values[2], 18.0);
        assert!((values[3] - mean).abs() < EPS);
        assert!((values[4] - avg_dev).abs() < EPS);
        assert_eq!(values[5], 8.0);
    }

    #[test]
    fn mode_ties_resolve_to_smallest_value() {
        let values = featurize_one(ElementalProperty::Number, "NaCl");
        assert_eq!(values[5], 11.0);
    }

    #[test]
    fn undefined_property_makes_all_statistics_undefined() {
        let values = featurize_one(ElementalProperty::Electronegativity, "XeF2");
        assert!(values.iter().all(|v| v.is_nan()));

        let values = featurize_one(ElementalProperty::Number, "XeF2");
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn featurization_is_deterministic() {
        let comp: Composition = "Al2Ni".parse().unwrap();
        let featurizer = ElementProperty::default();
        let first = featurizer.featurize(&comp).unwrap();
        let second = featurizer.featurize(&comp).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn statistic_names_deserialize_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            stats: Vec<Statistic>,
            properties: Vec<ElementalProperty>,
        }
        let parsed: Wrapper =
            toml::from_str("stats = [\"avg_dev\", \"mode\"]\nproperties = [\"MeltingT\"]").unwrap();
        assert_eq!(parsed.stats, vec![Statistic::AvgDev, Statistic::Mode]);
        assert_eq!(parsed.properties, vec![ElementalProperty::MeltingT]);
    }
}

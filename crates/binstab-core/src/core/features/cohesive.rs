use super::FeatureError;
use super::featurizer::Featurizer;
use crate::core::chem::composition::Composition;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// A provider of formation energies (eV/atom) for compositions.
///
/// `Ok(None)` means the source has no entry for the composition; `Err` is reserved
/// for failures of the source itself (I/O, network, malformed responses).
pub trait FormationEnergySource: Send + Sync {
    fn formation_energy_per_atom(
        &self,
        composition: &Composition,
    ) -> Result<Option<f64>, FeatureError>;
}

#[derive(Debug, Deserialize)]
struct FormationEnergyRow {
    formula: String,
    formation_energy_per_atom: f64,
}

/// Formation energies read from a `formula,formation_energy_per_atom` CSV file.
///
/// Formulas are keyed by their canonical form, so `OFe` and `Fe2O2` both resolve the
/// entry recorded for `FeO`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabulatedFormationEnergies {
    entries: HashMap<String, f64>,
}

impl TabulatedFormationEnergies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, composition: &Composition, energy: f64) {
        self.entries.insert(composition.canonical_formula(), energy);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self, FeatureError> {
        let path_str = path.to_string_lossy().to_string();
        let mut reader = csv::Reader::from_path(path).map_err(|e| FeatureError::Csv {
            path: path_str.clone(),
            source: e,
        })?;

        let mut table = Self::new();
        for result in reader.deserialize::<FormationEnergyRow>() {
            let row = result.map_err(|e| FeatureError::Csv {
                path: path_str.clone(),
                source: e,
            })?;
            let composition: Composition =
                row.formula.parse().map_err(|e| FeatureError::Formula {
                    path: path_str.clone(),
                    source: e,
                })?;
            table.insert(&composition, row.formation_energy_per_atom);
        }
        debug!(path = %path_str, entries = table.len(), "Loaded formation energy table");
        Ok(table)
    }
}

impl FormationEnergySource for TabulatedFormationEnergies {
    fn formation_energy_per_atom(
        &self,
        composition: &Composition,
    ) -> Result<Option<f64>, FeatureError> {
        Ok(self.entries.get(&composition.canonical_formula()).copied())
    }
}

/// Cohesive energy per atom: `-E_f + Σ xᵢ E_coh(i)`.
///
/// Undefined (`NaN`) when the formation energy or any elemental cohesive energy is
/// unknown.
#[derive(Clone)]
pub struct CohesiveEnergy {
    source: Arc<dyn FormationEnergySource>,
}

impl CohesiveEnergy {
    pub fn new(source: Arc<dyn FormationEnergySource>) -> Self {
        Self { source }
    }
}

impl Featurizer for CohesiveEnergy {
    fn name(&self) -> &'static str {
        "cohesive-energy"
    }

    fn feature_labels(&self) -> Vec<String> {
        vec!["cohesive energy".to_string()]
    }

    fn featurize(&self, composition: &Composition) -> Result<Vec<f64>, FeatureError> {
        if composition.is_empty() {
            return Err(FeatureError::EmptyComposition);
        }
        let Some(formation_energy) = self.source.formation_energy_per_atom(composition)? else {
            return Ok(vec![f64::NAN]);
        };

        let elemental: Option<f64> = composition
            .fractions()
            .into_iter()
            .map(|(el, x)| el.data().cohesive_energy.map(|e| x * e))
            .sum();

        Ok(vec![
            elemental.map_or(f64::NAN, |sum| sum - formation_energy),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chem::elements::Element;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn comp(formula: &str) -> Composition {
        formula.parse().unwrap()
    }

    fn source(entries: &[(&str, f64)]) -> Arc<TabulatedFormationEnergies> {
        let mut table = TabulatedFormationEnergies::new();
        for (formula, energy) in entries {
            table.insert(&comp(formula), *energy);
        }
        Arc::new(table)
    }

    #[test]
    fn combines_formation_and_elemental_energies() {
        let featurizer = CohesiveEnergy::new(source(&[("NaCl", -2.1)]));
        let na = Element::from_symbol("Na").unwrap().data().cohesive_energy.unwrap();
        let cl = Element::from_symbol("Cl").unwrap().data().cohesive_energy.unwrap();
        let value = featurizer.featurize(&comp("NaCl")).unwrap()[0];
        assert!((value - (2.1 + 0.5 * na + 0.5 * cl)).abs() < 1e-12);
    }

    #[test]
    fn missing_formation_energy_is_undefined() {
        let featurizer = CohesiveEnergy::new(source(&[]));
        assert!(featurizer.featurize(&comp("NaCl")).unwrap()[0].is_nan());
    }

    #[test]
    fn missing_elemental_energy_is_undefined() {
        // Helium has no tabulated cohesive energy.
        let featurizer = CohesiveEnergy::new(source(&[("HeNa", 0.3)]));
        assert!(featurizer.featurize(&comp("HeNa")).unwrap()[0].is_nan());
    }

    #[test]
    fn lookup_uses_canonical_formula() {
        let table = source(&[("FeO", -1.4)]);
        assert_eq!(
            table.formation_energy_per_atom(&comp("O2Fe2")).unwrap(),
            Some(-1.4)
        );
    }

    #[test]
    fn load_reads_csv_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("energies.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "formula,formation_energy_per_atom").unwrap();
        writeln!(file, "Fe2O3,-1.7").unwrap();
        writeln!(file, "NaCl,-2.1").unwrap();

        let table = TabulatedFormationEnergies::load(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.formation_energy_per_atom(&comp("NaCl")).unwrap(),
            Some(-2.1)
        );
    }

    #[test]
    fn load_reports_invalid_formula() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("energies.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "formula,formation_energy_per_atom").unwrap();
        writeln!(file, "Qq2,-1.0").unwrap();

        let result = TabulatedFormationEnergies::load(&path);
        assert!(matches!(result, Err(FeatureError::Formula { .. })));
    }

    #[test]
    fn load_reports_missing_file() {
        let result = TabulatedFormationEnergies::load(Path::new("/nonexistent/energies.csv"));
        assert!(matches!(result, Err(FeatureError::Csv { .. })));
    }
}

use crate::error::{CliError, Result};
use binstab::core::chem::composition::Composition;
use binstab::core::features::FeatureError;
use binstab::core::features::cohesive::FormationEnergySource;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.materialsproject.org";
const SUMMARY_ENDPOINT: &str = "/materials/summary/";
const SUMMARY_FIELDS: &str = "formation_energy_per_atom,energy_above_hull";
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Reads a single-line API key, ignoring surrounding whitespace.
pub fn read_api_key(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)?;
    let key = content.trim();
    if key.is_empty() {
        return Err(CliError::Config(format!(
            "API key file '{}' is empty.",
            path.display()
        )));
    }
    Ok(key.to_string())
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    data: Vec<SummaryEntry>,
}

#[derive(Debug, Deserialize)]
struct SummaryEntry {
    formation_energy_per_atom: Option<f64>,
    energy_above_hull: Option<f64>,
}

/// Formation energy of the polymorph closest to the convex hull.
fn ground_state(entries: &[SummaryEntry]) -> Option<f64> {
    entries
        .iter()
        .filter_map(|e| {
            e.formation_energy_per_atom
                .map(|ef| (e.energy_above_hull.unwrap_or(f64::INFINITY), ef))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, ef)| ef)
}

/// Formation energies looked up in the Materials Project summary endpoint.
///
/// Responses are cached per reduced formula, including misses, so each formula is
/// requested at most once per run.
pub struct MaterialsProjectClient {
    http: Client,
    base_url: String,
    api_key: String,
    cache: Mutex<HashMap<String, Option<f64>>>,
}

impl MaterialsProjectClient {
    pub fn new(api_key: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("binstab/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            cache: Mutex::new(HashMap::new()),
        })
    }

    pub fn from_key_file(path: &Path) -> Result<Self> {
        info!("Reading Materials Project API key from {:?}", path);
        Self::new(read_api_key(path)?)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn cached(&self, formula: &str) -> Option<Option<f64>> {
        match self.cache.lock() {
            Ok(cache) => cache.get(formula).copied(),
            Err(_) => {
                warn!("Formation energy cache mutex was poisoned; bypassing cache.");
                None
            }
        }
    }

    fn remember(&self, formula: String, value: Option<f64>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(formula, value);
        }
    }

    fn fetch(&self, formula: &str) -> Result<Option<f64>> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), SUMMARY_ENDPOINT);
        debug!("Querying Materials Project for {}", formula);
        let response: SummaryResponse = self
            .http
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .query(&[("formula", formula), ("_fields", SUMMARY_FIELDS)])
            .send()?
            .error_for_status()?
            .json()?;
        let energy = ground_state(&response.data);
        if energy.is_none() {
            debug!("No Materials Project entry for {}", formula);
        }
        Ok(energy)
    }
}

impl FormationEnergySource for MaterialsProjectClient {
    fn formation_energy_per_atom(
        &self,
        composition: &Composition,
    ) -> std::result::Result<Option<f64>, FeatureError> {
        let formula = composition.reduced_formula();
        if let Some(hit) = self.cached(&formula) {
            return Ok(hit);
        }
        let energy = self
            .fetch(&formula)
            .map_err(|e| FeatureError::FormationEnergy {
                formula: formula.clone(),
                message: e.to_string(),
            })?;
        self.remember(formula, energy);
        Ok(energy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binstab::core::chem::elements::Element;
    use std::fs;
    use tempfile::tempdir;

    fn composition(a: &str, b: &str, x: u32, y: u32) -> Composition {
        Composition::from_pair(
            Element::from_symbol(a).unwrap(),
            Element::from_symbol(b).unwrap(),
            x,
            y,
        )
        .unwrap()
    }

    #[test]
    fn api_key_is_trimmed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mp.key");
        fs::write(&path, "  abc123\n").unwrap();
        assert_eq!(read_api_key(&path).unwrap(), "abc123");
    }

    #[test]
    fn empty_api_key_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mp.key");
        fs::write(&path, "\n \n").unwrap();
        assert!(matches!(read_api_key(&path), Err(CliError::Config(_))));
        assert!(matches!(
            read_api_key(&dir.path().join("missing.key")),
            Err(CliError::Io(_))
        ));
    }

    #[test]
    fn ground_state_prefers_lowest_energy_above_hull() {
        let response: SummaryResponse = serde_json::from_str(
            r#"{"data": [
                {"formation_energy_per_atom": -1.1, "energy_above_hull": 0.2},
                {"formation_energy_per_atom": -1.5, "energy_above_hull": 0.0},
                {"formation_energy_per_atom": null, "energy_above_hull": 0.0}
            ], "meta": {"total_doc": 3}}"#,
        )
        .unwrap();
        assert_eq!(ground_state(&response.data), Some(-1.5));

        let empty: SummaryResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(ground_state(&empty.data), None);
    }

    #[test]
    fn cached_formulas_are_not_requested_again() {
        let client = MaterialsProjectClient::new("key".to_string())
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        client.remember("FeO".to_string(), Some(-1.4));
        client.remember("NaCl2".to_string(), None);

        assert_eq!(
            client
                .formation_energy_per_atom(&composition("Fe", "O", 2, 2))
                .unwrap(),
            Some(-1.4)
        );
        assert_eq!(
            client
                .formation_energy_per_atom(&composition("Na", "Cl", 1, 2))
                .unwrap(),
            None
        );
    }

    #[test]
    fn unreachable_service_surfaces_as_feature_error() {
        let client = MaterialsProjectClient::new("key".to_string())
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let result = client.formation_energy_per_atom(&composition("Al", "Ni", 1, 1));
        assert!(matches!(
            result,
            Err(FeatureError::FormationEnergy { ref formula, .. }) if formula == "AlNi"
        ));
    }
}

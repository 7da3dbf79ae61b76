pub mod evaluate;
pub mod featurize;
pub mod predict;
pub mod train;

use crate::config::{FeatureSelection, FormationEnergySetting};
use crate::error::{CliError, Result};
use crate::materials_project::MaterialsProjectClient;
use binstab::core::features::cohesive::{FormationEnergySource, TabulatedFormationEnergies};
use binstab::core::features::featurizer::MultipleFeaturizer;
use binstab::engine::error::EngineError;
use std::sync::Arc;
use tracing::info;

/// Instantiates the configured featurizers, opening the formation energy source
/// first when the cohesive-energy feature is enabled.
pub fn build_featurizer(selection: &FeatureSelection) -> Result<MultipleFeaturizer> {
    let source: Option<Arc<dyn FormationEnergySource>> = match &selection.formation_energies {
        FormationEnergySetting::Disabled => None,
        FormationEnergySetting::Table(path) => {
            let table = TabulatedFormationEnergies::load(path).map_err(EngineError::from)?;
            info!(
                "Loaded {} formation energies from {:?}",
                table.len(),
                path
            );
            Some(Arc::new(table))
        }
        FormationEnergySetting::MaterialsProject { api_key_file } => {
            Some(Arc::new(MaterialsProjectClient::from_key_file(api_key_file)?))
        }
    };
    let featurizer = selection.features.build(source)?;
    info!("Featurizers: {}", featurizer.names().join(", "));
    Ok(featurizer)
}

pub(crate) fn ensure_parent_dir(path: &std::path::Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            std::fs::create_dir_all(parent).map_err(CliError::from)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use binstab::core::features::featurizer::Featurizer;
    use binstab::engine::config::FeatureSetConfig;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn table_source_enables_cohesive_energy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ef.csv");
        fs::write(&path, "formula,formation_energy_per_atom\nFeO,-1.4\n").unwrap();

        let selection = FeatureSelection {
            features: FeatureSetConfig {
                stoichiometry: None,
                element_property: None,
                cohesive_energy: true,
            },
            formation_energies: FormationEnergySetting::Table(path),
        };
        let featurizer = build_featurizer(&selection).unwrap();
        assert_eq!(featurizer.feature_labels(), ["cohesive energy"]);
    }

    #[test]
    fn missing_formation_energy_table_is_reported() {
        let selection = FeatureSelection {
            features: FeatureSetConfig {
                cohesive_energy: true,
                ..Default::default()
            },
            formation_energies: FormationEnergySetting::Table("does-not-exist.csv".into()),
        };
        assert!(matches!(
            build_featurizer(&selection),
            Err(CliError::Core(EngineError::Feature { .. }))
        ));
    }

    fn write_systems(dir: &std::path::Path) -> std::path::PathBuf {
        let path = dir.join("systems.csv");
        fs::write(
            &path,
            "id,element_a,element_b,stability\n\
             1,Fe,O,\"[1, 0]\"\n2,Na,Cl,\"[0, 1]\"\n3,Al,Ni,\"[1, 1]\"\n4,Cu,Zn,\"[0, 0]\"\n5,Ar,F,\"[0, 0]\"\n",
        )
        .unwrap();
        path
    }

    fn parse(args: &[&str]) -> crate::cli::Commands {
        use clap::Parser;
        crate::cli::Cli::parse_from(std::iter::once("binstab").chain(args.iter().copied())).command
    }

    #[test]
    fn train_then_predict_writes_stability_column() {
        let dir = tempdir().unwrap();
        let input = write_systems(dir.path());
        let model = dir.path().join("models/tree.json");
        let output = dir.path().join("predictions.csv");
        let input_str = input.to_str().unwrap();

        let crate::cli::Commands::Train(args) = parse(&[
            "train",
            "-i",
            input_str,
            "-o",
            model.to_str().unwrap(),
            "--model",
            "decision-tree",
            "--no-oversample",
        ]) else {
            panic!("Expected 'train' subcommand");
        };
        train::run(args).unwrap();
        assert!(model.is_file());

        let crate::cli::Commands::Predict(args) = parse(&[
            "predict",
            "-i",
            input_str,
            "-o",
            output.to_str().unwrap(),
            "-m",
            model.to_str().unwrap(),
        ]) else {
            panic!("Expected 'predict' subcommand");
        };
        predict::run(args).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "id,element_a,element_b,stability,predicted_stability");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "1,Fe,O,\"[1, 0]\",\"[1, 0]\"");
    }

    #[test]
    fn featurize_writes_compound_table() {
        let dir = tempdir().unwrap();
        let input = write_systems(dir.path());
        let output = dir.path().join("features.csv");

        let crate::cli::Commands::Featurize(args) = parse(&[
            "featurize",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "-S",
            "features.element-property=false",
        ]) else {
            panic!("Expected 'featurize' subcommand");
        };
        featurize::run(args).unwrap();

        let written = fs::read_to_string(&output).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next().unwrap(),
            "group,slot,formula,label,0-norm,2-norm,3-norm,5-norm,7-norm,10-norm"
        );
        assert_eq!(lines.count(), 8);
    }

    #[test]
    fn parent_directories_are_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.csv");
        ensure_parent_dir(&path).unwrap();
        assert!(dir.path().join("nested/deeper").is_dir());
        ensure_parent_dir(std::path::Path::new("out.csv")).unwrap();
    }
}

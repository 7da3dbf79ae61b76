use crate::core::features::featurizer::Featurizer;
use crate::core::io::table::RecordTable;
use crate::engine::config::FeaturizeConfig;
use crate::engine::error::EngineError;
use crate::engine::pipeline;
use crate::engine::progress::ProgressReporter;
use tracing::instrument;

pub const LEADING_COLUMNS: [&str; 4] = ["group", "slot", "formula", "label"];

/// Produces the compound table: one row per compound with its group, slot,
/// formula and label (empty when unknown), followed by one column per feature.
#[instrument(skip_all, name = "featurize_workflow")]
pub fn run(
    table: &RecordTable,
    config: &FeaturizeConfig,
    featurizer: &dyn Featurizer,
    reporter: &ProgressReporter,
) -> Result<RecordTable, EngineError> {
    let prepared = pipeline::prepare(
        table,
        &config.data,
        &config.conversion,
        featurizer,
        reporter,
    )?;

    let headers = LEADING_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(prepared.features.labels().iter().cloned())
        .collect();
    let rows = prepared
        .compounds
        .rows()
        .iter()
        .enumerate()
        .map(|(i, compound)| {
            let mut row = vec![
                compound.group.to_string(),
                compound.slot.to_string(),
                compound.composition.to_string(),
                compound.label.map(|l| l.to_string()).unwrap_or_default(),
            ];
            row.extend(prepared.features.row(i).iter().map(|v| v.to_string()));
            row
        })
        .collect();
    Ok(RecordTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::FeatureSetConfig;

    #[test]
    fn writes_one_row_per_compound_with_features() {
        let input = RecordTable::read_from(
            "element_a,element_b,stability\nNa,Cl,\"[0, 1]\"\nFe,O,\n".as_bytes(),
            b',',
        )
        .unwrap();
        let featurizer = FeatureSetConfig {
            stoichiometry: Some(vec![0]),
            element_property: None,
            cohesive_energy: false,
        }
        .build(None)
        .unwrap();
        let output = run(
            &input,
            &FeaturizeConfig::default(),
            &featurizer,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(output.headers(), ["group", "slot", "formula", "label", "0-norm"]);
        assert_eq!(
            output.rows(),
            [
                vec!["0", "0", "Na2Cl", "0", "2"],
                vec!["0", "1", "NaCl2", "1", "2"],
                vec!["1", "0", "Fe2O", "", "2"],
                vec!["1", "1", "FeO2", "", "2"],
            ]
        );
    }
}

use super::config::{ConversionConfig, DataConfig};
use super::converter;
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use crate::core::features::featurizer::{Featurizer, featurize_compounds};
use crate::core::io::table::RecordTable;
use crate::core::models::compound::CompoundSet;
use crate::core::models::features::FeatureMatrix;
use crate::core::models::record::SystemRecord;
use std::path::Path;
use tracing::{info, instrument};

/// Everything derived from one input table, ready for learning.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    /// The table after subsampling; compound `source_row`s index into it.
    pub table: RecordTable,
    pub compounds: CompoundSet,
    pub features: FeatureMatrix,
}

impl PreparedData {
    /// Labels of every compound, failing on the first unlabelled one.
    pub fn labels(&self, purpose: &'static str) -> Result<Vec<u8>, EngineError> {
        if self.compounds.is_empty() {
            return Err(EngineError::NoData { purpose });
        }
        if let Some(row) = self.compounds.first_unlabelled() {
            return Err(EngineError::MissingLabel {
                row: row.source_row,
                formula: row.composition.to_string(),
            });
        }
        self.compounds
            .labels()
            .ok_or_else(|| EngineError::Internal("labels vanished after check".to_string()))
    }
}

pub fn load_table(path: &Path, data: &DataConfig) -> Result<RecordTable, EngineError> {
    let table = RecordTable::read_from_path(path, data.delimiter)?;
    info!(path = %path.display(), rows = table.len(), "Loaded record table");
    Ok(table)
}

pub fn subsample(table: &RecordTable, data: &DataConfig) -> RecordTable {
    match data.subsample {
        Some(n) if n < table.len() => {
            info!(kept = n, total = table.len(), seed = data.seed, "Subsampling rows");
            table.subsample(n, data.seed)
        }
        _ => table.clone(),
    }
}

pub fn parse_records(
    table: &RecordTable,
    data: &DataConfig,
) -> Result<Vec<SystemRecord>, EngineError> {
    Ok(table.parse_records(&data.columns)?)
}

pub fn convert(
    records: &[SystemRecord],
    conversion: &ConversionConfig,
) -> Result<CompoundSet, EngineError> {
    Ok(converter::convert(records, conversion)?)
}

pub fn featurize(
    compounds: &CompoundSet,
    featurizer: &dyn Featurizer,
    data: &DataConfig,
) -> Result<FeatureMatrix, EngineError> {
    Ok(featurize_compounds(
        featurizer,
        compounds,
        &data.columns.features,
    )?)
}

/// Runs subsample, parse, convert and featurize in sequence.
#[instrument(skip_all, name = "prepare_data")]
pub fn prepare(
    table: &RecordTable,
    data: &DataConfig,
    conversion: &ConversionConfig,
    featurizer: &dyn Featurizer,
    reporter: &ProgressReporter,
) -> Result<PreparedData, EngineError> {
    let table = subsample(table, data);

    let compounds = reporter.phase("Converting records", || {
        let records = parse_records(&table, data)?;
        convert(&records, conversion)
    })?;
    reporter.report(Progress::Message(format!(
        "{} compound pairs from {} records",
        compounds.num_pairs(),
        table.len()
    )));

    let features = reporter.phase("Computing features", || {
        featurize(&compounds, featurizer, data)
    })?;
    info!(
        compounds = features.nrows(),
        features = features.ncols(),
        "Prepared feature matrix"
    );

    Ok(PreparedData {
        table,
        compounds,
        features,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::FeatureSetConfig;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn table(csv: &str) -> RecordTable {
        RecordTable::read_from(csv.as_bytes(), b',').unwrap()
    }

    #[test]
    fn prepare_produces_one_feature_row_per_compound() {
        let input = table("element_a,element_b,stability\nFe,O,\"[1, 0]\"\nXe,F,\"[0, 0]\"\nNa,Cl,\"[0, 1]\"\n");
        let featurizer = FeatureSetConfig::default().build(None).unwrap();
        let prepared = prepare(
            &input,
            &DataConfig::default(),
            &ConversionConfig::default(),
            &featurizer,
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(prepared.compounds.num_pairs(), 2);
        assert_eq!(prepared.features.nrows(), 4);
        assert_eq!(prepared.labels("train").unwrap(), vec![1, 0, 0, 1]);
        assert_eq!(prepared.compounds.source_rows(), vec![0, 2]);
    }

    #[test]
    fn unlabelled_rows_are_reported() {
        let input = table("element_a,element_b,stability\nFe,O,\"[1, 0]\"\nNa,Cl,\n");
        let featurizer = FeatureSetConfig::default().build(None).unwrap();
        let prepared = prepare(
            &input,
            &DataConfig::default(),
            &ConversionConfig::default(),
            &featurizer,
            &ProgressReporter::new(),
        )
        .unwrap();
        assert!(matches!(
            prepared.labels("train"),
            Err(EngineError::MissingLabel { row: 1, .. })
        ));
    }

    #[test]
    fn subsample_is_a_no_op_without_limit() {
        let input = table("element_a,element_b\nFe,O\nNa,Cl\nAl,Ni\n");
        assert_eq!(subsample(&input, &DataConfig::default()), input);

        let data = DataConfig {
            subsample: Some(2),
            seed: 5,
            ..Default::default()
        };
        assert_eq!(subsample(&input, &data).len(), 2);
    }

    #[test]
    fn load_table_honours_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("systems.tsv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "element_a\telement_b").unwrap();
        writeln!(file, "Fe\tO").unwrap();

        let data = DataConfig {
            delimiter: b'\t',
            ..Default::default()
        };
        let loaded = load_table(&path, &data).unwrap();
        assert_eq!(loaded.headers(), ["element_a", "element_b"]);
        assert_eq!(loaded.len(), 1);
    }
}

use crate::core::chem::ChemError;
use crate::core::chem::elements::Element;
use crate::core::models::ids::GroupId;
use crate::core::models::record::{StabilityParseError, SystemRecord};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Delimited text error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Required column '{0}' is missing from the table header")]
    MissingColumn(String),
    #[error("Column '{0}' already exists in the table")]
    DuplicateColumn(String),
    #[error("Column '{column}' has {found} values but the table has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: RecordParseErrorKind },
}

#[derive(Debug, Error)]
pub enum RecordParseErrorKind {
    #[error("invalid element in column '{column}': {source}")]
    Element { column: String, source: ChemError },
    #[error("invalid stability vector in column '{column}': {source}")]
    Stability {
        column: String,
        source: StabilityParseError,
    },
    #[error("invalid group id in column '{column}' (value: '{value}')")]
    Group { column: String, value: String },
    #[error("invalid numeric feature in column '{column}' (value: '{value}')")]
    Feature { column: String, value: String },
}

/// Names of the columns the record parser reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub element_a: String,
    pub element_b: String,
    /// Parsed when present in the table; unlabelled data simply lacks it.
    pub stability: String,
    pub group: Option<String>,
    pub features: Vec<String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            element_a: "element_a".to_string(),
            element_b: "element_b".to_string(),
            stability: "stability".to_string(),
            group: None,
            features: Vec::new(),
        }
    }
}

/// An in-memory delimited table: a header and string cells.
///
/// Tables are treated as values; every transformation returns a new table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RecordTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    pub fn read_from(reader: impl Read, delimiter: u8) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn read_from_path(path: &Path, delimiter: u8) -> Result<Self, TableError> {
        debug!("Reading record table from {:?}", path);
        let file = File::open(path).map_err(|e| TableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::read_from(BufReader::new(file), delimiter)
    }

    pub fn write_to(&self, writer: impl Write, delimiter: u8) -> Result<(), TableError> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush().map_err(|e| TableError::Io {
            path: "<writer>".to_string(),
            source: e,
        })?;
        Ok(())
    }

    pub fn write_to_path(&self, path: &Path, delimiter: u8) -> Result<(), TableError> {
        debug!("Writing record table with {} rows to {:?}", self.len(), path);
        let file = File::create(path).map_err(|e| TableError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        self.write_to(BufWriter::new(file), delimiter)
    }

    /// Returns a copy of the table with `values` appended as a new column.
    pub fn with_column(&self, name: &str, values: Vec<String>) -> Result<Self, TableError> {
        if self.column_index(name).is_some() {
            return Err(TableError::DuplicateColumn(name.to_string()));
        }
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLength {
                column: name.to_string(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }

        let mut headers = self.headers.clone();
        headers.push(name.to_string());
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(row, value)| {
                let mut row = row.clone();
                row.push(value);
                row
            })
            .collect();
        Ok(Self { headers, rows })
    }

    /// Returns a copy of the table holding only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Keeps `n` rows drawn uniformly without replacement, preserving their original
    /// order. Asking for at least as many rows as the table holds keeps everything.
    pub fn subsample(&self, n: usize, seed: u64) -> Self {
        if n >= self.rows.len() {
            return self.clone();
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut picked = index::sample(&mut rng, self.rows.len(), n).into_vec();
        picked.sort_unstable();
        self.select_rows(&picked)
    }

    /// Parses every row into a [`SystemRecord`] according to `mapping`.
    pub fn parse_records(&self, mapping: &ColumnMapping) -> Result<Vec<SystemRecord>, TableError> {
        let a_idx = self.require_column(&mapping.element_a)?;
        let b_idx = self.require_column(&mapping.element_b)?;
        let stability_idx = self.column_index(&mapping.stability);
        let group_idx = mapping
            .group
            .as_deref()
            .map(|name| self.require_column(name))
            .transpose()?;
        let feature_idx = mapping
            .features
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<_>, _>>()?;

        if stability_idx.is_none() {
            debug!(
                "Stability column '{}' not present; records are unlabelled.",
                mapping.stability
            );
        }

        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let line = row_idx + 2;
                let parse_err = |kind| TableError::Parse { line, kind };

                let element = |idx: usize, column: &str| {
                    Element::from_symbol(&row[idx]).map_err(|source| {
                        parse_err(RecordParseErrorKind::Element {
                            column: column.to_string(),
                            source,
                        })
                    })
                };
                let element_a = element(a_idx, &mapping.element_a)?;
                let element_b = element(b_idx, &mapping.element_b)?;

                let mut record = SystemRecord::new(row_idx, element_a, element_b);

                if let Some(idx) = stability_idx {
                    let cell = row[idx].trim();
                    if !cell.is_empty() {
                        record.stability = Some(cell.parse().map_err(|source| {
                            parse_err(RecordParseErrorKind::Stability {
                                column: mapping.stability.clone(),
                                source,
                            })
                        })?);
                    }
                }

                if let (Some(idx), Some(column)) = (group_idx, mapping.group.as_ref()) {
                    let cell = row[idx].trim();
                    let group = cell.parse::<u32>().map_err(|_| {
                        parse_err(RecordParseErrorKind::Group {
                            column: column.clone(),
                            value: cell.to_string(),
                        })
                    })?;
                    record.group = Some(GroupId(group));
                }

                record.features = feature_idx
                    .iter()
                    .zip(&mapping.features)
                    .map(|(&idx, column)| {
                        let cell = row[idx].trim();
                        if cell.is_empty() {
                            return Ok(None);
                        }
                        cell.parse::<f64>().map(Some).map_err(|_| {
                            parse_err(RecordParseErrorKind::Feature {
                                column: column.clone(),
                                value: cell.to_string(),
                            })
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                Ok(record)
            })
            .collect()
    }
}

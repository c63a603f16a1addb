use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CONTENT_COLUMN, DEFAULT_LABEL_COLUMN, RunConfig};
use crate::error::{LabelError, Result};

/// One input row: the payload to encode and the identifier printed beneath it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub content: String,
    pub label_id: String,
}

impl SampleRecord {
    pub fn new(content: impl Into<String>, label_id: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            label_id: label_id.into(),
        }
    }
}

/// Header names of the payload and identifier columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    pub content: String,
    pub label: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            content: DEFAULT_CONTENT_COLUMN.to_string(),
            label: DEFAULT_LABEL_COLUMN.to_string(),
        }
    }
}

impl From<&RunConfig> for Columns {
    fn from(cfg: &RunConfig) -> Self {
        Self {
            content: cfg.content_column.clone(),
            label: cfg.label_column.clone(),
        }
    }
}

/// Parse CSV rows into records, in file order.
///
/// Both columns must be present in the header row; extra columns are ignored.
pub fn read_records<R: Read>(reader: R, columns: &Columns) -> Result<Vec<SampleRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let content_idx = column_index(&headers, &columns.content)?;
    let label_idx = column_index(&headers, &columns.label)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(SampleRecord {
            content: row.get(content_idx).unwrap_or_default().to_string(),
            label_id: row.get(label_idx).unwrap_or_default().to_string(),
        });
    }
    tracing::debug!(count = records.len(), "read sample records");
    Ok(records)
}

/// Open a CSV file and read its records.
pub fn load_records(path: &Path, columns: &Columns) -> Result<Vec<SampleRecord>> {
    let file = File::open(path)?;
    read_records(file, columns)
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| {
            let found: Vec<&str> = headers.iter().collect();
            LabelError::InvalidInput(format!(
                "missing column {name:?} (found: {})",
                found.join(", ")
            ))
        })
}

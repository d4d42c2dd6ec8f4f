//! CSV ingestion.
//!
//! Reads the data files declared for an API, maps every row through the
//! field mapping and bulk-indexes the results in batches.

use std::path::Path;
use std::sync::Arc;

use csv::{ReaderBuilder, Trim};
use search_api_shared::{IndexedRecord, RawRecord};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::errors::SearchApiError;
use crate::field_mapper::{map_field_names, nest_fields, FieldMapping};
use crate::interfaces::SearchIndexProvider;
use crate::types::ImportSummary;

/// Configuration for the importer.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Maximum number of documents sent in one bulk request.
    pub batch_size: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self { batch_size: 1000 }
    }
}

/// Read a CSV file with a header row into raw records.
///
/// Every cell is kept as a string; type coercion happens in the field mapper.
pub fn read_csv_records(path: &Path) -> Result<Vec<RawRecord>, SearchApiError> {
    let invalid = |e: csv::Error| {
        SearchApiError::invalid_data(format!("Failed to read {}: {}", path.display(), e))
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_path(path)
        .map_err(invalid)?;

    let headers = reader.headers().map_err(invalid)?.clone();

    reader
        .records()
        .map(|record| -> Result<RawRecord, SearchApiError> {
            let record = record.map_err(invalid)?;
            Ok(headers
                .iter()
                .zip(record.iter())
                .map(|(header, field)| (header.to_string(), Value::String(field.to_string())))
                .collect())
        })
        .collect()
}

/// Loads data files into the search index.
pub struct Importer {
    provider: Arc<dyn SearchIndexProvider>,
    config: ImportConfig,
}

impl Importer {
    /// Create an importer with the default batch size.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: ImportConfig::default(),
        }
    }

    /// Create an importer with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: ImportConfig) -> Self {
        Self { provider, config }
    }

    /// Import one CSV file into a scoped index.
    ///
    /// Each row is mapped through `mapping` and its dotted field names are
    /// nested. Rows that map to an empty document are skipped. Documents the engine
    /// rejects are counted in the summary; a failed bulk request aborts the
    /// import.
    #[instrument(skip(self, mapping), fields(path = %path.display()))]
    pub async fn import_file(
        &self,
        index: &str,
        path: &Path,
        mapping: &FieldMapping,
    ) -> Result<ImportSummary, SearchApiError> {
        let rows = read_csv_records(path)?;
        let mut summary = ImportSummary {
            files: 1,
            rows: rows.len(),
            ..ImportSummary::default()
        };

        let documents: Vec<IndexedRecord> = rows
            .iter()
            .map(|row| map_field_names(row, mapping))
            .filter(|document| !document.is_empty())
            .map(nest_fields)
            .collect();

        if documents.len() < rows.len() {
            debug!(
                skipped = rows.len() - documents.len(),
                "Rows without any mapped field were skipped"
            );
        }

        for batch in documents.chunks(self.config.batch_size.max(1)) {
            let batch_summary = self.provider.bulk_index_documents(index, batch).await?;
            if batch_summary.failed > 0 {
                warn!(
                    index = %index,
                    succeeded = batch_summary.succeeded,
                    failed = batch_summary.failed,
                    "Bulk index completed with some failures"
                );
            }
            summary.record_batch(&batch_summary);
        }

        info!(
            index = %index,
            rows = summary.rows,
            indexed = summary.indexed,
            failed = summary.failed,
            "Imported file"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_csv_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("colleges.csv");
        fs::write(
            &path,
            "INSTNM, LATITUDE ,ZIP\nYale University,41.31,06520\nBrown University,41.82,02912\n",
        )
        .unwrap();

        let records = read_csv_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["INSTNM"], "Yale University");
        assert_eq!(records[0]["LATITUDE"], "41.31");
        // Cells stay strings; leading zeros survive
        assert_eq!(records[1]["ZIP"], "02912");
    }

    #[test]
    fn test_missing_file_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        let result = read_csv_records(&dir.path().join("missing.csv"));
        assert!(matches!(result, Err(SearchApiError::InvalidData(_))));
    }

    #[test]
    fn test_ragged_row_is_invalid_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "a,b\n1,2\n3\n").unwrap();
        assert!(matches!(
            read_csv_records(&path),
            Err(SearchApiError::InvalidData(_))
        ));
    }
}

//! Request and response types for search index operations.

/// Result of a batch operation for a single document.
///
/// Identifies the document by its position in the submitted batch and
/// indicates whether the engine accepted it.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOperationResult {
    /// Position of the document in the submitted batch.
    pub position: usize,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Engine-reported reason if the operation failed.
    pub error: Option<String>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// This allows callers to handle partial failures of a bulk request without
/// failing the whole import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOperationSummary {
    /// Total number of items in the batch.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    /// Summary of an empty batch.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a summary from individual results.
    pub fn from_results(results: Vec<BatchOperationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

/// Totals for a full import of every configured API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of APIs imported.
    pub apis: usize,
    /// Number of data files read.
    pub files: usize,
    /// Number of rows read from the data files.
    pub rows: usize,
    /// Number of documents the engine accepted.
    pub indexed: usize,
    /// Number of documents the engine rejected.
    pub failed: usize,
}

impl ImportSummary {
    /// Add the outcome of one bulk request.
    pub fn record_batch(&mut self, summary: &BatchOperationSummary) {
        self.indexed += summary.succeeded;
        self.failed += summary.failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_results() {
        let summary = BatchOperationSummary::from_results(vec![
            BatchOperationResult {
                position: 0,
                success: true,
                error: None,
            },
            BatchOperationResult {
                position: 1,
                success: false,
                error: Some("mapper_parsing_exception".to_string()),
            },
        ]);

        assert_eq!(summary.total, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);

        let mut import = ImportSummary::default();
        import.record_batch(&summary);
        import.record_batch(&summary);
        assert_eq!(import.indexed, 2);
        assert_eq!(import.failed, 2);
    }
}

//! Error types for table parsing.

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while reading a CSV document into a table.
///
/// Per-row problems (bad dates, missing regions) are not errors here; they are
/// reported per region by the merge step.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The document has no header row.
    #[error("CSV input is empty")]
    Empty,

    /// A data row has a different number of cells than the header.
    #[error("Row {row} has {found} fields, expected {expected}")]
    RowLength {
        row: usize,
        found: usize,
        expected: usize,
    },

    /// A column every row needs is absent from the header.
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    /// Failure from the CSV reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

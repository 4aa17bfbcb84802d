//! Header-addressed CSV tables.

use std::collections::HashMap;
use std::io::Read;

use super::error::{ParseError, ParseResult};

/// A CSV document held as strings, addressed by header name.
///
/// Column order is preserved as it appears in the header; nothing here assumes
/// date columns are sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WideTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl WideTable {
    /// Parse CSV text with a header row.
    pub fn from_csv_str(content: &str) -> ParseResult<Self> {
        Self::from_reader(content.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> ParseResult<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.iter().all(String::is_empty) {
            return Err(ParseError::Empty);
        }

        let mut rows = Vec::new();
        for (i, record) in csv_reader.records().enumerate() {
            let record = record.map_err(|e| match e.kind() {
                csv::ErrorKind::UnequalLengths { len, .. } => ParseError::RowLength {
                    row: i + 1,
                    found: *len as usize,
                    expected: headers.len(),
                },
                _ => ParseError::Csv(e),
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self::new(headers, rows))
    }

    /// Build a table from already split cells. Rows must match the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Self {
            headers,
            index,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(move |cells| TableRow { table: self, cells })
    }
}

/// Borrowed view of one data row.
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    table: &'a WideTable,
    cells: &'a [String],
}

impl<'a> TableRow<'a> {
    /// Cell under `column`, `None` if the table has no such column.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.table
            .index
            .get(column)
            .and_then(|&i| self.cells.get(i))
            .map(String::as_str)
    }

    /// `(header, cell)` pairs in header order.
    pub fn cells(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.table
            .headers
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n\
                          Hubei,China,30.97,112.27,444,444\n\
                          ,Italy,43.0,12.0,0,0\n";

    #[test]
    fn test_parses_headers_and_rows() {
        let table = WideTable::from_csv_str(SAMPLE).unwrap();
        assert_eq!(table.headers().len(), 6);
        assert_eq!(table.len(), 2);
        assert!(table.has_column("Country/Region"));
        assert!(!table.has_column("Admin2"));
    }

    #[test]
    fn test_row_lookup_by_column() {
        let table = WideTable::from_csv_str(SAMPLE).unwrap();
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get("Province/State"), Some("Hubei"));
        assert_eq!(rows[1].get("Province/State"), Some(""));
        assert_eq!(rows[1].get("1/23/20"), Some("0"));
        assert_eq!(rows[1].get("missing"), None);
    }

    #[test]
    fn test_cells_follow_header_order() {
        let table = WideTable::from_csv_str(SAMPLE).unwrap();
        let row = table.rows().next().unwrap();
        let headers: Vec<&str> = row.cells().map(|(h, _)| h).collect();
        assert_eq!(headers[0], "Province/State");
        assert_eq!(headers[5], "1/23/20");
    }

    #[test]
    fn test_quoted_cells_with_commas() {
        let csv = "Country/Region,Province/State,1/22/20\n\"Korea, South\",,1\n";
        let table = WideTable::from_csv_str(csv).unwrap();
        let row = table.rows().next().unwrap();
        assert_eq!(row.get("Country/Region"), Some("Korea, South"));
    }

    #[test]
    fn test_row_length_mismatch_is_error() {
        let csv = "Country/Region,1/22/20\nItaly,1,2\n";
        let err = WideTable::from_csv_str(csv).unwrap_err();
        assert!(matches!(err, ParseError::RowLength { row: 1, found: 3, expected: 2 }));
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(matches!(WideTable::from_csv_str(""), Err(ParseError::Empty)));
    }
}

use std::collections::HashMap;

use async_trait::async_trait;

use super::{CsvSource, SourceError, SourceKind, SourceResult};

/// Tables held in memory. Used for tests and local experiments.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: HashMap<SourceKind, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, kind: SourceKind, csv: impl Into<String>) -> Self {
        self.tables.insert(kind, csv.into());
        self
    }
}

#[async_trait]
impl CsvSource for InMemorySource {
    async fn fetch(&self, kind: SourceKind) -> SourceResult<String> {
        self.tables
            .get(&kind)
            .cloned()
            .ok_or(SourceError::Missing(kind))
    }

    fn describe(&self, kind: SourceKind) -> String {
        format!("{} (in memory)", kind)
    }
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::debug;

use super::{CsvSource, SourceError, SourceKind, SourceResult};

/// Tables read from files on disk.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    paths: HashMap<SourceKind, PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four tables under `dir` with their usual file names.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut source = Self::new();
        for kind in SourceKind::ALL {
            source = source.with_path(kind, dir.join(default_file_name(kind)));
        }
        source
    }

    pub fn with_path(mut self, kind: SourceKind, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }

    pub fn path(&self, kind: SourceKind) -> Option<&Path> {
        self.paths.get(&kind).map(PathBuf::as_path)
    }
}

/// File name of each table in the upstream repository layout.
pub fn default_file_name(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Confirmed => "time_series_covid19_confirmed_global.csv",
        SourceKind::Deaths => "time_series_covid19_deaths_global.csv",
        SourceKind::Recovered => "time_series_covid19_recovered_global.csv",
        SourceKind::Lockdown => "countryLockdowndates.csv",
    }
}

async fn read_file(path: &Path) -> SourceResult<String> {
    debug!("Reading {}", path.display());
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| SourceError::Io {
            path: path.display().to_string(),
            source: e,
        })
}

#[async_trait]
impl CsvSource for FileSource {
    async fn fetch(&self, kind: SourceKind) -> SourceResult<String> {
        let path = self.path(kind).ok_or(SourceError::Missing(kind))?;
        read_file(path).await
    }

    fn describe(&self, kind: SourceKind) -> String {
        match self.path(kind) {
            Some(path) => format!("{} ({})", kind, path.display()),
            None => kind.to_string(),
        }
    }
}

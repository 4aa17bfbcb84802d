//! Source locations as written in configuration: a URL or a file path.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::file::FileSource;
use super::{CsvSource, SourceError, SourceKind, SourceResult};

/// Where one table lives. `http://` and `https://` values are downloaded,
/// anything else is a path on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Url(String),
    File(PathBuf),
}

impl SourceLocation {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceLocation::Url(raw.to_string())
        } else {
            SourceLocation::File(PathBuf::from(raw))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SourceLocation::Url(_))
    }
}

impl FromStr for SourceLocation {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Url(url) => f.write_str(url),
            SourceLocation::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Serialize for SourceLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SourceLocation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// One location per table; each table may be local or remote.
///
/// Local tables are read through a [`FileSource`], remote ones through an
/// [`HttpSource`](super::HttpSource) sharing one HTTP client.
#[derive(Debug, Clone, Default)]
pub struct LocatedSource {
    locations: HashMap<SourceKind, SourceLocation>,
    files: FileSource,
    #[cfg(feature = "remote-sources")]
    remote: super::HttpSource,
}

impl LocatedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, kind: SourceKind, location: SourceLocation) -> Self {
        match &location {
            SourceLocation::File(path) => self.files = self.files.with_path(kind, path.clone()),
            #[cfg(feature = "remote-sources")]
            SourceLocation::Url(url) => self.remote = self.remote.with_url(kind, url.clone()),
            #[cfg(not(feature = "remote-sources"))]
            SourceLocation::Url(_) => {}
        }
        self.locations.insert(kind, location);
        self
    }

    pub fn location(&self, kind: SourceKind) -> Option<&SourceLocation> {
        self.locations.get(&kind)
    }

    #[cfg(feature = "remote-sources")]
    async fn fetch_remote(&self, kind: SourceKind, _url: &str) -> SourceResult<String> {
        self.remote.fetch(kind).await
    }

    #[cfg(not(feature = "remote-sources"))]
    async fn fetch_remote(&self, _kind: SourceKind, url: &str) -> SourceResult<String> {
        Err(SourceError::FeatureDisabled(url.to_string()))
    }
}

impl FromIterator<(SourceKind, SourceLocation)> for LocatedSource {
    fn from_iter<I: IntoIterator<Item = (SourceKind, SourceLocation)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |source, (kind, location)| {
                source.with_location(kind, location)
            })
    }
}

#[async_trait]
impl CsvSource for LocatedSource {
    async fn fetch(&self, kind: SourceKind) -> SourceResult<String> {
        match self.location(kind).ok_or(SourceError::Missing(kind))? {
            SourceLocation::Url(url) => self.fetch_remote(kind, url).await,
            SourceLocation::File(_) => self.files.fetch(kind).await,
        }
    }

    fn describe(&self, kind: SourceKind) -> String {
        match self.location(kind) {
            Some(location) => format!("{} ({})", kind, location),
            None => kind.to_string(),
        }
    }
}

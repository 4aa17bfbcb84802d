use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::{CsvSource, SourceError, SourceKind, SourceResult};

const USER_AGENT: &str = concat!("outbreak-trends/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Tables downloaded over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    urls: HashMap<SourceKind, String>,
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSource {
    pub fn new() -> Self {
        Self {
            client: default_client(),
            urls: HashMap::new(),
        }
    }

    pub fn with_url(mut self, kind: SourceKind, url: impl Into<String>) -> Self {
        self.urls.insert(kind, url.into());
        self
    }

    pub fn url(&self, kind: SourceKind) -> Option<&str> {
        self.urls.get(&kind).map(String::as_str)
    }
}

fn default_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .unwrap_or_default()
}

async fn download(client: &Client, url: &str) -> SourceResult<String> {
    debug!("Downloading {}", url);
    let http_error = |e: reqwest::Error| SourceError::Http {
        url: url.to_string(),
        message: e.to_string(),
    };

    let response = client.get(url).send().await.map_err(http_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().await.map_err(http_error)
}

#[async_trait]
impl CsvSource for HttpSource {
    async fn fetch(&self, kind: SourceKind) -> SourceResult<String> {
        let url = self.url(kind).ok_or(SourceError::Missing(kind))?;
        download(&self.client, url).await
    }

    fn describe(&self, kind: SourceKind) -> String {
        match self.url(kind) {
            Some(url) => format!("{} ({})", kind, url),
            None => kind.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_kind_is_missing() {
        let source = HttpSource::new().with_url(SourceKind::Confirmed, "https://example.org/c.csv");
        assert_eq!(source.url(SourceKind::Confirmed), Some("https://example.org/c.csv"));
        assert_eq!(source.describe(SourceKind::Deaths), "deaths");
        assert!(matches!(
            source.fetch(SourceKind::Deaths).await,
            Err(SourceError::Missing(SourceKind::Deaths))
        ));
    }
}

use std::path::PathBuf;

use geography::FeatureCollection;
use reqwest::Client;
use serde::Deserialize;
use state::{BoxFuture, LookupError, ReportLookup};
use tracing::debug;

/// Envelope returned by the report endpoint.
#[derive(Debug, Deserialize)]
struct ReportResponse {
    status: String,
    #[serde(default)]
    report: Option<FeatureCollection>,
}

/// Decode a report endpoint body. Any status mentioning "success" counts as
/// success; everything else is surfaced as a backend error.
fn decode_report(body: &str) -> Result<FeatureCollection, LookupError> {
    let resp: ReportResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Decode(e.to_string()))?;
    if !resp.status.to_ascii_lowercase().contains("success") {
        return Err(LookupError::Backend(resp.status));
    }
    resp.report.ok_or_else(|| LookupError::Decode("success status without report".into()))
}

/// `GET {base}/report?query=...` against the report service.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: Client,
    base_url: String,
}

impl HttpLookup {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/report", self.base_url.trim_end_matches('/'))
    }

    async fn fetch(&self, query: &str) -> Result<FeatureCollection, LookupError> {
        let url = self.endpoint();
        debug!("report GET {url} query={query:?}");
        let resp = self
            .client
            .get(&url)
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|e| LookupError::Http(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }
        let body = resp
            .text()
            .await
            .map_err(|e| LookupError::Http(e.to_string()))?;
        decode_report(&body)
    }
}

impl ReportLookup for HttpLookup {
    fn lookup<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<FeatureCollection, LookupError>> {
        Box::pin(self.fetch(query))
    }
}

/// File name stem for a query: lowercase ASCII alphanumerics, everything
/// else collapsed to single dashes.
pub fn slug(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for c in query.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Reports read from `<dir>/<slug(query)>.geojson`, for offline runs.
#[derive(Debug, Clone)]
pub struct FileLookup {
    root: PathBuf,
}

impl FileLookup {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, query: &str) -> PathBuf {
        self.root.join(format!("{}.geojson", slug(query)))
    }

    async fn read(&self, query: &str) -> Result<FeatureCollection, LookupError> {
        let stem = slug(query);
        if stem.is_empty() {
            return Err(LookupError::NotFound(query.to_string()));
        }
        let path = self.path_for(query);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(LookupError::NotFound(query.to_string()));
            }
            Err(err) => return Err(LookupError::Backend(format!("{}: {err}", path.display()))),
        };
        serde_json::from_str(&raw).map_err(|e| LookupError::Decode(e.to_string()))
    }
}

impl ReportLookup for FileLookup {
    fn lookup<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<FeatureCollection, LookupError>> {
        Box::pin(self.read(query))
    }
}

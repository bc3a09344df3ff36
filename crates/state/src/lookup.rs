//! Capability interface to the geocoding/report backend.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use geography::FeatureCollection;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The backend knows no geography for the query.
    NotFound(String),
    /// Transport failure before a response arrived.
    Http(String),
    /// Non-success HTTP status.
    Status(u16),
    /// Response body was not a report.
    Decode(String),
    /// The backend answered with a non-success report status.
    Backend(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::NotFound(q) => write!(f, "no geography found for {q:?}"),
            LookupError::Http(msg) => write!(f, "report request failed: {msg}"),
            LookupError::Status(code) => write!(f, "report backend returned HTTP {code}"),
            LookupError::Decode(msg) => write!(f, "report response malformed: {msg}"),
            LookupError::Backend(status) => write!(f, "report backend status: {status}"),
        }
    }
}

impl std::error::Error for LookupError {}

/// Resolves a query into a geography report.
///
/// On success the collection holds zero or more features, at most one of
/// them flagged `is_target`.
pub trait ReportLookup: Send + Sync {
    fn lookup<'a>(&'a self, query: &'a str)
        -> BoxFuture<'a, Result<FeatureCollection, LookupError>>;
}

/// Identifies one lookup so late answers to superseded queries can be
/// dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// A lookup the host should run and report back via
/// `Dashboard::on_lookup_result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub id: RequestId,
    pub query: String,
}

/// Fixed answers keyed by exact query text.
#[derive(Debug, Default)]
pub struct InMemoryLookup {
    reports: HashMap<String, FeatureCollection>,
}

impl InMemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, query: impl Into<String>, report: FeatureCollection) {
        self.reports.insert(query.into(), report);
    }
}

impl ReportLookup for InMemoryLookup {
    fn lookup<'a>(
        &'a self,
        query: &'a str,
    ) -> BoxFuture<'a, Result<FeatureCollection, LookupError>> {
        let result = self
            .reports
            .get(query)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(query.to_string()));
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_lookup_answers_known_queries() {
        let mut lookup = InMemoryLookup::new();
        lookup.insert("Cook County", FeatureCollection::default());

        assert_eq!(lookup.lookup("Cook County").await, Ok(FeatureCollection::default()));
        assert_eq!(
            lookup.lookup("Atlantis").await,
            Err(LookupError::NotFound("Atlantis".into()))
        );
    }

    #[test]
    fn errors_render_for_banners() {
        assert_eq!(
            LookupError::Status(502).to_string(),
            "report backend returned HTTP 502"
        );
        assert_eq!(
            LookupError::NotFound("x".into()).to_string(),
            "no geography found for \"x\""
        );
    }
}

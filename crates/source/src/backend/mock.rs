//! In-memory data source for testing.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::backend::{DataSource, Fetched};
use crate::error::{ErrorKind, Result};

struct State {
    payload: Value,
    tag: Option<String>,
    offline: bool,
}

/// In-memory data source for testing.
///
/// The payload and tag live behind a [`RwLock`], so tests can publish a new
/// "remote" version while the source is shared. Every probe and fetch is
/// counted, which lets tests assert that the freshness checker avoided a
/// download.
///
/// By default the tag is exposed by both the probe and the fetch. Use
/// [`without_probe()`](Self::without_probe) to model a transport that only
/// reveals the tag on a full fetch, and [`without_tags()`](Self::without_tags)
/// for one that never reveals it.
///
/// # Examples
///
/// ```
/// use emojidb_source::{DataSource, backend::MockSource};
/// use serde_json::json;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = MockSource::new("https://example.com/data.json", json!([])).with_tag("v1");
/// assert_eq!(source.probe_version_tag().await?, Some("v1".to_string()));
/// assert_eq!(source.probe_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MockSource {
    url: String,
    state: RwLock<State>,
    probe_supported: bool,
    fetch_tag_supported: bool,
    weak_fetch_tag: bool,
    probes: AtomicUsize,
    fetches: AtomicUsize,
}

impl MockSource {
    /// Create a mock source serving `payload`, with no tag.
    pub fn new(url: impl Into<String>, payload: Value) -> Self {
        Self {
            url: url.into(),
            state: RwLock::new(State {
                payload,
                tag: None,
                offline: false,
            }),
            probe_supported: true,
            fetch_tag_supported: true,
            weak_fetch_tag: false,
            probes: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.state.get_mut().tag = Some(tag.into());
        self
    }

    /// The probe always reports "no tag", as when a server doesn't expose
    /// `ETag` to cross-origin `HEAD` requests.
    pub fn without_probe(mut self) -> Self {
        self.probe_supported = false;
        self
    }

    /// Neither the probe nor the fetch report a tag.
    pub fn without_tags(mut self) -> Self {
        self.probe_supported = false;
        self.fetch_tag_supported = false;
        self
    }

    /// The fetch reports the weak form of the probe's tag (`W/"abc"` for
    /// `"abc"`), as a server compressing its `GET` responses does.
    pub fn with_weak_fetch_tag(mut self) -> Self {
        self.weak_fetch_tag = true;
        self
    }

    /// Publish a new remote version.
    pub async fn publish(&self, payload: Value, tag: Option<&str>) {
        let mut state = self.state.write().await;
        state.payload = payload;
        state.tag = tag.map(str::to_string);
    }

    /// Make every subsequent call fail with a network error.
    pub async fn set_offline(&self, offline: bool) {
        self.state.write().await.offline = offline;
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for MockSource {
    fn url(&self) -> &str {
        &self.url
    }

    async fn probe_version_tag(&self) -> Result<Option<String>> {
        self.probes.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        if state.offline {
            exn::bail!(ErrorKind::Network(format!("{} is unreachable", self.url)));
        }
        Ok(state.tag.clone().filter(|_| self.probe_supported))
    }

    async fn fetch_with_tag(&self) -> Result<Fetched> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        if state.offline {
            exn::bail!(ErrorKind::Network(format!("{} is unreachable", self.url)));
        }
        let tag = match self.weak_fetch_tag {
            true => state.tag.as_ref().map(|tag| format!("W/{tag}")),
            false => state.tag.clone(),
        };
        Ok(Fetched {
            tag: tag.filter(|_| self.fetch_tag_supported),
            payload: state.payload.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_probe_and_fetch_report_tag() {
        let source = MockSource::new("mock://emoji", json!([1])).with_tag("abc");
        assert_eq!(source.probe_version_tag().await.unwrap(), Some("abc".to_string()));
        let fetched = source.fetch_with_tag().await.unwrap();
        assert_eq!(fetched.tag, Some("abc".to_string()));
        assert_eq!(fetched.payload, json!([1]));
        assert_eq!((source.probe_count(), source.fetch_count()), (1, 1));
    }

    #[tokio::test]
    async fn test_without_probe() {
        let source = MockSource::new("mock://emoji", json!([])).with_tag("abc").without_probe();
        assert_eq!(source.probe_version_tag().await.unwrap(), None);
        assert_eq!(source.fetch_with_tag().await.unwrap().tag, Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_without_tags() {
        let source = MockSource::new("mock://emoji", json!([])).with_tag("abc").without_tags();
        assert_eq!(source.probe_version_tag().await.unwrap(), None);
        assert_eq!(source.fetch_with_tag().await.unwrap().tag, None);
    }

    #[tokio::test]
    async fn test_weak_fetch_tag() {
        let source = MockSource::new("mock://emoji", json!([])).with_tag("\"abc\"").with_weak_fetch_tag();
        assert_eq!(source.probe_version_tag().await.unwrap(), Some("\"abc\"".to_string()));
        assert_eq!(source.fetch_with_tag().await.unwrap().tag, Some("W/\"abc\"".to_string()));
    }

    #[tokio::test]
    async fn test_publish_replaces_payload() {
        let source = MockSource::new("mock://emoji", json!([1])).with_tag("v1");
        source.publish(json!([2]), Some("v2")).await;
        let fetched = source.fetch_with_tag().await.unwrap();
        assert_eq!(fetched, Fetched { tag: Some("v2".to_string()), payload: json!([2]) });
    }

    #[tokio::test]
    async fn test_offline() {
        let source = MockSource::new("mock://emoji", json!([]));
        source.set_offline(true).await;
        let err = source.probe_version_tag().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
        assert!(err.is_retryable());
    }
}

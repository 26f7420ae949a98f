use crate::error::{ErrorKind, Result};
use emojidb_cache::{LoadOutcome, Loader};
use emojidb_extract::json_checksum;
use emojidb_source::SourceHandle;
use exn::ResultExt;
use serde_json::Value;
use tracing::instrument;

/// What a freshness check did to the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The stored dataset already matched the source; nothing was written.
    UpToDate,
    /// The stored dataset was replaced.
    Loaded { removed: usize, inserted: usize },
}
impl From<LoadOutcome> for Outcome {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            // Another checker won the race to load the same version.
            LoadOutcome::AlreadyCurrent => Self::UpToDate,
            LoadOutcome::Replaced { removed, inserted } => Self::Loaded { removed, inserted },
        }
    }
}

/// Use the transport's tag if there is one, otherwise derive one from the
/// payload itself.
fn resolve_tag(tag: Option<String>, payload: &Value) -> Result<String> {
    match tag {
        Some(tag) => Ok(tag),
        None => json_checksum(payload).or_raise(|| ErrorKind::Checksum),
    }
}

/// Make sure the store holds the source's current dataset, downloading it
/// only if it doesn't.
///
/// 1. Probe the source for its version tag. If the probe can't tell, do a
///    full fetch instead, and checksum the payload if even that has no tag.
/// 2. If the stored fingerprint matches `(source url, tag)`, stop.
/// 3. Otherwise fetch the payload (unless step 1 already did) and load it.
///
/// Fetch failures are returned as-is; nothing is retried here.
#[instrument(skip_all, fields(url = source.url()))]
pub async fn check_for_updates(source: &SourceHandle, loader: &Loader) -> Result<Outcome> {
    let mut payload = None;
    let tag = match source.probe_version_tag().await.or_raise(|| ErrorKind::Fetch)? {
        Some(tag) => tag,
        None => {
            let fetched = source.fetch_with_tag().await.or_raise(|| ErrorKind::Fetch)?;
            let tag = resolve_tag(fetched.tag, &fetched.payload)?;
            payload = Some(fetched.payload);
            tag
        },
    };
    if loader.has_data(source.url(), &tag).await.or_raise(|| ErrorKind::Cache)? {
        tracing::info!(tag, "Database already populated");
        return Ok(Outcome::UpToDate);
    }
    tracing::info!(tag, "Database update available");
    // Store the tag the next check will compare against. A transport may
    // report the same version differently on a probe and on a download
    // (`"abc"` vs `W/"abc"`), so the download's tag is ignored here.
    let payload = match payload {
        Some(payload) => payload,
        None => source.fetch_with_tag().await.or_raise(|| ErrorKind::Fetch)?.payload,
    };
    let outcome = loader.load(&payload, source.url(), &tag).await.or_raise(|| ErrorKind::Cache)?;
    Ok(outcome.into())
}

/// Download and load the source's dataset without consulting the stored
/// fingerprint first. Meant for an empty store, where a probe would be a
/// wasted request.
#[instrument(skip_all, fields(url = source.url()))]
pub async fn load_first_time(source: &SourceHandle, loader: &Loader) -> Result<Outcome> {
    let fetched = source.fetch_with_tag().await.or_raise(|| ErrorKind::Fetch)?;
    let tag = resolve_tag(fetched.tag, &fetched.payload)?;
    let outcome = loader.load(&fetched.payload, source.url(), &tag).await.or_raise(|| ErrorKind::Cache)?;
    Ok(outcome.into())
}

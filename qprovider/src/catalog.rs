//! Model catalog retrieval and ranking.
//!
//! ```rust
//! use qprovider::rank_models;
//!
//! let ranked = rank_models(vec![
//!     "gpt-3.5-turbo".to_string(),
//!     "whisper-1".to_string(),
//!     "gpt-4o".to_string(),
//! ]);
//! let ids: Vec<_> = ranked.iter().map(|entry| entry.id.as_str()).collect();
//! assert_eq!(ids, ["gpt-4o", "gpt-3.5-turbo"]);
//! ```

use crate::{ResponsesTransport, SecretString};

/// Families usable by the request builder: chat generations and reasoning models.
pub const ALLOWED_MODEL_PREFIXES: [&str; 4] = ["gpt-", "o1", "o3", "o4"];

/// Most-current family first; the first matching prefix decides the rank.
pub const PRIORITY_ORDER: [&str; 8] = [
    "gpt-5", "gpt-4.1", "gpt-4o", "gpt-4", "gpt-3.5", "o4", "o3", "o1",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub id: String,
}

impl ModelEntry {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    fn priority(&self) -> usize {
        PRIORITY_ORDER
            .iter()
            .position(|prefix| self.id.starts_with(prefix))
            .unwrap_or(PRIORITY_ORDER.len())
    }
}

/// Filters to allow-listed families and sorts by priority, then lexically.
pub fn rank_models(ids: Vec<String>) -> Vec<ModelEntry> {
    let mut entries = ids
        .into_iter()
        .filter(|id| ALLOWED_MODEL_PREFIXES.iter().any(|prefix| id.starts_with(prefix)))
        .map(ModelEntry::new)
        .collect::<Vec<_>>();

    entries.sort_by(|left, right| {
        left.priority()
            .cmp(&right.priority())
            .then_with(|| left.id.cmp(&right.id))
    });
    entries
}

/// Fetches and ranks the catalog.
///
/// `None` covers a blank credential, a failed listing, and an empty filtered
/// list alike; callers cannot tell these apart.
pub async fn list_models(
    transport: &dyn ResponsesTransport,
    credential: &str,
) -> Option<Vec<ModelEntry>> {
    if credential.trim().is_empty() {
        return None;
    }

    let api_key = SecretString::new(credential);
    let ids = match transport.list_models(&api_key).await {
        Ok(ids) => ids,
        Err(error) => {
            tracing::debug!(event = "model_listing_failed", error = %error);
            return None;
        }
    };

    let ranked = rank_models(ids);
    (!ranked.is_empty()).then_some(ranked)
}

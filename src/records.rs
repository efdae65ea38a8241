use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::episodes::EpisodeSet;

/// One show known to the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub url: String,
}

/// Persisted result of resolving a show title against the catalog.
///
/// Created once per title on first resolution and replaced wholesale on
/// re-fetch; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub query_title: String,
    pub matched_title: String,
    pub url: String,
    pub filler_episodes: EpisodeSet,
    pub fetched_at: DateTime<Utc>,
}

impl ClassificationRecord {
    pub fn is_filler(&self, episode: u32) -> bool {
        self.filler_episodes.contains(episode)
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use crate::classification;
use crate::cli::SourceArgs;
use crate::matching;
use crate::records::{CatalogEntry, ClassificationRecord};
use crate::sources::{AnimeFillerList, CatalogSource, ClassificationSource};
use crate::store::{self, ClassificationStore, LocalFsStore};

/// Terminal outcomes of [`Resolver::resolve`] that are not failures.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// A classification exists for this title. `from_cache` is false only
    /// on the call that performed the fetch.
    Resolved {
        record: ClassificationRecord,
        from_cache: bool,
    },
    /// No catalog entry cleared the match threshold. Never cached, so a
    /// later call retries against a possibly changed catalog or title.
    NoMatch,
}

/// Failures a presentation layer must be able to tell apart from
/// [`Resolution::NoMatch`]: the classification may well exist, this run
/// just could not reach it. None of these are retried here; the caller
/// re-invokes on its own schedule.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("catalog unavailable")]
    CatalogUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("classification unavailable: {url}")]
    ClassificationUnavailable {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("classification store failed")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ResolveError {
    fn catalog(err: anyhow::Error) -> Self {
        Self::CatalogUnavailable(err.into())
    }

    fn store(err: anyhow::Error) -> Self {
        Self::Store(err.into())
    }
}

/// Resolves show titles to filler classifications.
///
/// Holds the process-wide catalog cache (first successful fetch wins, no
/// expiry) and the per-title in-flight locks. All state is internal;
/// callers just share one resolver.
pub struct Resolver {
    catalog_source: Arc<dyn CatalogSource>,
    classification_source: Arc<dyn ClassificationSource>,
    store: Arc<dyn ClassificationStore>,
    catalog: OnceCell<Vec<CatalogEntry>>,
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Resolver {
    pub fn new(
        catalog_source: Arc<dyn CatalogSource>,
        classification_source: Arc<dyn ClassificationSource>,
        store: Arc<dyn ClassificationStore>,
    ) -> Self {
        Self {
            catalog_source,
            classification_source,
            store,
            catalog: OnceCell::new(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves `query_title` to its filler classification.
    ///
    /// A cached record is returned without touching the network. Otherwise
    /// the catalog is fetched (once per process), fuzzy-matched, and the
    /// matched show's classification page parsed and persisted. Concurrent
    /// calls for the same title are serialized on a per-title lock so at
    /// most one performs the fetch-and-persist sequence; the others pick up
    /// the freshly cached record.
    pub async fn resolve(&self, query_title: &str) -> Result<Resolution, ResolveError> {
        let key = store::cache_key(query_title);

        if let Some(record) = self.store.get(&key).await.map_err(ResolveError::store)? {
            tracing::debug!(title = query_title, "classification cache hit");
            return Ok(Resolution::Resolved {
                record,
                from_cache: true,
            });
        }

        let title_lock = self.title_lock(&key).await;
        let _guard = title_lock.lock().await;

        // An in-flight resolution for this title may have persisted while
        // we waited on the lock.
        if let Some(record) = self.store.get(&key).await.map_err(ResolveError::store)? {
            tracing::debug!(title = query_title, "cache filled while waiting");
            return Ok(Resolution::Resolved {
                record,
                from_cache: true,
            });
        }

        let catalog = self
            .catalog
            .get_or_try_init(|| self.catalog_source.fetch_catalog())
            .await
            .map_err(ResolveError::catalog)?;

        let Some(matched) = matching::best_match(query_title, catalog) else {
            tracing::info!(title = query_title, "no catalog entry cleared the match threshold");
            return Ok(Resolution::NoMatch);
        };
        tracing::info!(
            title = query_title,
            matched = %matched.entry.title,
            score = matched.score,
            "matched catalog entry"
        );

        let url = matched.entry.url.clone();
        let html = self
            .classification_source
            .fetch_classification(&url)
            .await
            .map_err(|err| ResolveError::ClassificationUnavailable {
                url: url.clone(),
                source: err.into(),
            })?;

        let parsed = classification::extract_filler_episodes(&html);
        for token in &parsed.rejected {
            tracing::warn!(token = %token, url = %url, "skipping malformed episode token");
        }
        tracing::debug!(count = parsed.episodes.len(), url = %url, "extracted filler episodes");

        let record = ClassificationRecord {
            query_title: query_title.to_owned(),
            matched_title: matched.entry.title.clone(),
            url,
            filler_episodes: parsed.episodes,
            fetched_at: chrono::Utc::now(),
        };
        self.store
            .set(&key, &record)
            .await
            .map_err(ResolveError::store)?;

        Ok(Resolution::Resolved {
            record,
            from_cache: false,
        })
    }

    async fn title_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut in_flight = self.in_flight.lock().await;
        Arc::clone(in_flight.entry(key.to_owned()).or_default())
    }
}

/// Wires the HTTP-backed sources and the on-disk store into a resolver.
pub fn build_resolver(args: &SourceArgs) -> anyhow::Result<Resolver> {
    let site = Arc::new(AnimeFillerList::new(&args.base_url())?);
    let store = Arc::new(LocalFsStore::new(args.cache_dir()));
    Ok(Resolver::new(site.clone(), site, store))
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::fs;

use crate::cli::CacheClearArgs;
use crate::records::ClassificationRecord;

/// Derives the storage key for a show title: lowercased, with every
/// character that is not alphanumeric mapped to `_`. The same derivation
/// keys cache lookups, persisted records, and in-flight de-duplication.
pub fn cache_key(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Persistent classification cache. Records are written whole so readers
/// never observe a partial record; the only way to remove them is
/// [`ClassificationStore::clear`].
#[async_trait]
pub trait ClassificationStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<ClassificationRecord>>;
    async fn set(&self, key: &str, record: &ClassificationRecord) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
}

/// Stores one JSON file per show under `<base>/records/`.
#[derive(Debug, Clone)]
pub struct LocalFsStore {
    base_dir: PathBuf,
}

impl LocalFsStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn records_dir(&self) -> PathBuf {
        self.base_dir.join("records")
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.records_dir().join(format!("{key}.json"))
    }
}

#[async_trait]
impl ClassificationStore for LocalFsStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<ClassificationRecord>> {
        let path = self.record_path(key);
        read_json(&path)
            .await
            .with_context(|| format!("read: {}", path.display()))
    }

    async fn set(&self, key: &str, record: &ClassificationRecord) -> anyhow::Result<()> {
        write_json_atomic(&self.record_path(key), record)
            .await
            .context("write classification record")
    }

    async fn clear(&self) -> anyhow::Result<()> {
        let dir = self.records_dir();
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("clear records dir: {}", dir.display()))
            }
        }
    }
}

/// In-memory store, mainly for tests and one-shot runs without a cache
/// directory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: tokio::sync::Mutex<HashMap<String, ClassificationRecord>>,
}

#[async_trait]
impl ClassificationStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<ClassificationRecord>> {
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, record: &ClassificationRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .await
            .insert(key.to_owned(), record.clone());
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.records.lock().await.clear();
        Ok(())
    }
}

/// Default cache location: `FILLERSKIP_CACHE_DIR`, else
/// `~/.cache/fillerskip`, else `.fillerskip` in the working directory.
pub fn default_cache_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FILLERSKIP_CACHE_DIR") {
        return PathBuf::from(dir);
    }
    std::env::var("HOME")
        .map(|home| PathBuf::from(home).join(".cache").join("fillerskip"))
        .unwrap_or_else(|_| PathBuf::from(".fillerskip"))
}

pub async fn run_clear(args: CacheClearArgs) -> anyhow::Result<()> {
    let store = LocalFsStore::new(args.cache_dir());
    store.clear().await.context("clear classification cache")?;
    println!("Classification cache cleared");
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let value = serde_json::from_slice(&bytes).context("parse json")?;
    Ok(Some(value))
}

// Write-to-temp plus rename keeps concurrent readers from ever seeing a
// half-written record.
async fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    fs::create_dir_all(parent)
        .await
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    let data = serde_json::to_vec_pretty(value).context("serialize json")?;
    fs::write(&tmp_path, &data)
        .await
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::episodes::EpisodeSet;

    fn record(query_title: &str, episodes: &[u32]) -> ClassificationRecord {
        ClassificationRecord {
            query_title: query_title.to_owned(),
            matched_title: query_title.to_owned(),
            url: format!("https://example.com/shows/{query_title}"),
            filler_episodes: episodes.iter().copied().collect::<EpisodeSet>(),
            fetched_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn cache_key_collapses_punctuation() {
        assert_eq!(cache_key("Naruto: Shippuden!"), "naruto__shippuden_");
        assert_eq!(cache_key("One Piece"), "one_piece");
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = LocalFsStore::new(temp.path());

        let record = record("Naruto", &[26, 97]);
        store.set("naruto", &record).await?;

        let loaded = store.get("naruto").await?;
        assert_eq!(loaded, Some(record));
        Ok(())
    }

    #[tokio::test]
    async fn missing_key_is_none() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = LocalFsStore::new(temp.path());
        assert_eq!(store.get("nothing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn set_replaces_the_whole_record() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = LocalFsStore::new(temp.path());

        store.set("bleach", &record("Bleach", &[1, 2, 3])).await?;
        let updated = record("Bleach", &[64]);
        store.set("bleach", &updated).await?;

        assert_eq!(store.get("bleach").await?, Some(updated));
        Ok(())
    }

    #[tokio::test]
    async fn clear_removes_every_record() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = LocalFsStore::new(temp.path());

        store.set("naruto", &record("Naruto", &[26])).await?;
        store.set("bleach", &record("Bleach", &[64])).await?;
        store.clear().await?;

        assert_eq!(store.get("naruto").await?, None);
        assert_eq!(store.get("bleach").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn clear_on_empty_store_is_fine() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let store = LocalFsStore::new(temp.path());
        store.clear().await?;
        Ok(())
    }
}

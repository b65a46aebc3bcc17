use crate::domain::ports::CartStorage;
use crate::utils::error::Result;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// File-backed storage: one JSON file per key under `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// 將 key 轉成安全的檔名，例如 `@RocketShoes:cart` -> `_RocketShoes_cart.json`
    pub fn file_name(key: &str) -> String {
        let stem: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}.json", stem)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(Self::file_name(key))
    }
}

impl CartStorage for LocalStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No stored cart at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, data: &str) -> Result<()> {
        let path = self.path_for(key);
        tokio::fs::create_dir_all(&self.base_path).await?;

        // 先寫暫存檔再改名，避免寫到一半留下壞檔
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, data).await?;
        tokio::fs::rename(&tmp_path, &path).await?;

        tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

/// In-memory storage. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: impl Into<String>, data: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), data.into());
        Self {
            entries: Arc::new(Mutex::new(entries)),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }
}

impl CartStorage for MemoryStorage {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, data: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), data.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_sanitizes_key() {
        assert_eq!(LocalStorage::file_name("@RocketShoes:cart"), "_RocketShoes_cart.json");
        assert_eq!(LocalStorage::file_name("../cart"), ".._cart.json");
    }

    #[tokio::test]
    async fn test_local_storage_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path());

        assert_eq!(storage.load("@RocketShoes:cart").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_local_storage_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("nested"));

        storage.save("@RocketShoes:cart", "[]").await.unwrap();
        storage
            .save("@RocketShoes:cart", r#"[{"id":1,"amount":2}]"#)
            .await
            .unwrap();

        let loaded = storage.load("@RocketShoes:cart").await.unwrap();
        assert_eq!(loaded.as_deref(), Some(r#"[{"id":1,"amount":2}]"#));
        assert!(!temp_dir
            .path()
            .join("nested")
            .join("_RocketShoes_cart.json.tmp")
            .exists());
    }

    #[test]
    fn test_memory_storage_clones_share_state() {
        tokio_test::block_on(async {
            let storage = MemoryStorage::new();
            let other = storage.clone();

            storage.save("cart", "[]").await.unwrap();
            assert_eq!(other.load("cart").await.unwrap().as_deref(), Some("[]"));
            assert_eq!(other.load("missing").await.unwrap(), None);
        });
    }
}

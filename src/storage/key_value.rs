use std::{
    future::Future,
    io::ErrorKind,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{bail, Result};
use fs4::tokio::AsyncFileExt;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tracing::debug;

/// Interface for abstracting a string key-value store.
pub trait KeyValueStore {
    /// Retrieves the value stored under `key`, or `None` if there is nothing under it.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>>;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>>;
}

impl<T: Deref> KeyValueStore for T
where
    T::Target: KeyValueStore,
{
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> {
        self.deref().get(key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> {
        self.deref().set(key, value)
    }
}

/// The main realization of [KeyValueStore]. Every key is a json file inside `dir`.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;

        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            bail!("Key {key:?} can't be used as a file name");
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    async fn read_locked(path: &Path) -> std::result::Result<String, std::io::Error> {
        let mut file = File::open(path).await?;
        file.lock_shared()?;
        let mut value = String::new();
        let result = file.read_to_string(&mut value).await;
        file.unlock_async().await?;
        result.map(|_| value)
    }

    async fn write_locked(path: &Path, value: &str) -> std::result::Result<(), std::io::Error> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .await?;
        file.lock_exclusive()?;
        let result = async {
            file.set_len(0).await?;
            file.write_all(value.as_bytes()).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;
        file.unlock_async().await?;
        result
    }
}

impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        debug!("Reading {path:?}");
        match Self::read_locked(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)?,
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        // Written next to the target and renamed, so a cut-off write never replaces old data.
        let temporary = path.with_extension("json.tmp");
        debug!("Writing {path:?}");
        Self::write_locked(&temporary, value).await?;
        tokio::fs::rename(&temporary, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{FileKeyValueStore, KeyValueStore};

    #[tokio::test]
    async fn test_missing_key_is_none() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().to_owned())?;
        assert_eq!(store.get("nothing").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_then_get() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().to_owned())?;

        store.set("state", "{\"a\":1}").await?;
        store.set("state", "{}").await?;

        assert_eq!(store.get("state").await?.as_deref(), Some("{}"));
        assert!(dir.path().join("state.json").exists());
        assert!(!dir.path().join("state.json.tmp").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_shorter_value_replaces_leftover_temporary() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().to_owned())?;
        std::fs::write(dir.path().join("state.json.tmp"), "a leftover from a cut-off write")?;

        store.set("state", "{}").await?;

        assert_eq!(store.get("state").await?.as_deref(), Some("{}"));
        Ok(())
    }

    #[tokio::test]
    async fn test_creates_missing_directory() -> Result<()> {
        let dir = tempdir()?;
        let nested = dir.path().join("a").join("b");
        let store = FileKeyValueStore::new(nested.clone())?;
        store.set("key", "value").await?;
        assert!(nested.join("key.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() -> Result<()> {
        let dir = tempdir()?;
        let store = FileKeyValueStore::new(dir.path().to_owned())?;
        assert!(store.set("../escape", "value").await.is_err());
        assert!(store.get("").await.is_err());
        Ok(())
    }
}

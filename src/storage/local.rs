//! Local filesystem state store.
//!
//! One JSON file holding the [`PreviousState`] record. Writes go to a
//! temp file first and are renamed into place, so a crash mid-write
//! leaves the previous record readable.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{PreviousState, StateStore};

/// JSON-file-backed state store.
#[derive(Debug, Clone)]
pub struct LocalStateStore {
    path: PathBuf,
}

impl LocalStateStore {
    /// Create a store backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StateStore for LocalStateStore {
    async fn load(&self) -> Result<PreviousState> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No state file at {:?}, treating as first run", self.path);
                Ok(PreviousState::default())
            }
            Err(e) => Err(AppError::Io(e)),
        }
    }

    async fn save(&self, state: &PreviousState) -> Result<()> {
        self.ensure_dir().await?;
        let bytes = serde_json::to_vec_pretty(state)?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_returns_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path().join("state.json"));

        let state = store.load().await.unwrap();
        assert_eq!(state, PreviousState::default());
        assert!(state.historico.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path().join("state.json"));

        let state = PreviousState {
            historico: "Em tramitação".into(),
            info_complementar: "Anexo I".into(),
        };
        store.save(&state).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn test_save_overwrites_in_full() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path().join("state.json"));

        store
            .save(&PreviousState {
                historico: "old".into(),
                info_complementar: "old".into(),
            })
            .await
            .unwrap();
        store
            .save(&PreviousState {
                historico: "new".into(),
                info_complementar: String::new(),
            })
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.historico, "new");
        assert!(loaded.info_complementar.is_empty());
    }

    #[tokio::test]
    async fn test_save_creates_parent_dir() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path().join("nested/dir/state.json"));

        store.save(&PreviousState::default()).await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStateStore::new(tmp.path().join("state.json"));

        store.save(&PreviousState::default()).await.unwrap();
        assert!(!tmp.path().join("state.tmp").exists());
    }
}

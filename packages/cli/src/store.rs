//! Documents stored as JSON files on disk

use mediakit_editor::{DocumentTree, Persistence, PersistenceError, SaveReceipt, Snapshot};
use std::path::PathBuf;
use tracing::debug;

/// Loads any file under `root` by relative (or absolute) path; saves to
/// `save_as`
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
    save_as: Option<PathBuf>,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            save_as: None,
        }
    }

    pub fn saving_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_as = Some(path.into());
        self
    }
}

fn backend_error(
    action: &str,
    path: &std::path::Path,
    e: impl std::fmt::Display,
) -> PersistenceError {
    PersistenceError::Backend(format!("cannot {} {}: {}", action, path.display(), e))
}

impl Persistence for FileStore {
    async fn save(&self, snapshot: &Snapshot) -> Result<SaveReceipt, PersistenceError> {
        let Some(target) = &self.save_as else {
            return Err(PersistenceError::Backend("no output path configured".to_string()));
        };
        let path = self.root.join(target);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| backend_error("create", parent, e))?;
        }

        // Pretty-printed so saved kits diff nicely
        let tree = snapshot.restore()?;
        let json =
            serde_json::to_string_pretty(&tree).map_err(|e| backend_error("encode", &path, e))?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| backend_error("write", &path, e))?;

        debug!(path = %path.display(), "document written");
        Ok(SaveReceipt {
            key: Some(path.display().to_string()),
        })
    }

    async fn load(&self, key: &str) -> Result<DocumentTree, PersistenceError> {
        let path = self.root.join(key);
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| backend_error("read", &path, e))?;

        let tree = Snapshot::from_json(&json)?.restore()?;
        debug!(path = %path.display(), sections = tree.sections.len(), "document read");
        Ok(tree)
    }
}

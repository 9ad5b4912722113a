use super::{Document, StoreResult};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Line-delimited JSON snapshot of one collection.
pub struct JsonlSnapshot {
    path: PathBuf,
}

impl JsonlSnapshot {
    pub fn new(dir: &Path, collection: &str) -> Self {
        Self {
            path: dir.join(format!("{collection}.jsonl")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every document. A missing file is an empty collection.
    ///
    /// Blank lines are skipped; a line that is not a JSON object fails the read.
    pub async fn read(&self) -> StoreResult<Vec<Document>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No snapshot found");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut documents = Vec::new();
        for line in contents.lines().filter(|l| !l.trim().is_empty()) {
            documents.push(serde_json::from_str::<Document>(line)?);
        }
        Ok(documents)
    }

    /// Replace the snapshot with `documents`.
    ///
    /// Writes to a sibling temp file and renames it over the old snapshot.
    pub async fn write(&self, documents: &[Document]) -> StoreResult<()> {
        let mut buffer = String::new();
        for document in documents {
            buffer.push_str(&serde_json::to_string(document)?);
            buffer.push('\n');
        }

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("jsonl.tmp");
        tokio::fs::write(&tmp, buffer).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            warn!(path = %self.path.display(), error = %e, "Snapshot rename failed");
            return Err(e.into());
        }
        Ok(())
    }
}

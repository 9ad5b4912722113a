use super::jsonl::JsonlSnapshot;
use super::{Document, DocumentStore, Filter, Query, StoreError, StoreResult};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Collection {
    documents: Vec<Document>,
    unique_fields: Vec<String>,
}

impl Collection {
    /// Reject `incoming` if any of it collides on a unique field with stored
    /// documents or with itself. Documents without the field are not indexed.
    fn check_unique(&self, name: &str, incoming: &[Document]) -> StoreResult<()> {
        for field in &self.unique_fields {
            let mut seen: HashSet<String> = self
                .documents
                .iter()
                .filter_map(|d| d.get(field))
                .map(Value::to_string)
                .collect();

            for value in incoming.iter().filter_map(|d| d.get(field)) {
                if !seen.insert(value.to_string()) {
                    return Err(StoreError::DuplicateKey {
                        collection: name.to_string(),
                        field: field.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// In-process document store.
///
/// Each call takes the collection lock once, so a single call is atomic with
/// respect to every other call. Nothing spans calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
    data_dir: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty, non-persistent store
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a store backed by JSONL snapshots in `data_dir`.
    ///
    /// Every `<name>.jsonl` file found becomes collection `name`.
    pub async fn open(data_dir: &Path) -> StoreResult<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let mut collections = HashMap::new();
        let mut entries = tokio::fs::read_dir(data_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let documents = JsonlSnapshot::new(data_dir, name).read().await?;
            info!(collection = name, documents = documents.len(), "Loaded snapshot");
            collections.insert(
                name.to_string(),
                Collection {
                    documents,
                    unique_fields: Vec::new(),
                },
            );
        }

        Ok(Self {
            collections: RwLock::new(collections),
            data_dir: Some(data_dir.to_path_buf()),
        })
    }

    /// Number of documents in `collection`
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, |c| c.documents.len())
    }
}

impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, query: Query) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(stored) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched: Vec<Document> = stored
            .documents
            .iter()
            .filter(|d| query.filter.matches(d))
            .cloned()
            .collect();

        if let Some(sort) = &query.sort {
            // Stable, so ties keep insertion order.
            matched.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }
        Ok(matched)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();

        stored.check_unique(collection, std::slice::from_ref(&document))?;
        stored.documents.push(document);
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> StoreResult<usize> {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();

        stored.check_unique(collection, &documents)?;
        let inserted = documents.len();
        stored.documents.extend(documents);
        debug!(collection, inserted, "Bulk insert");
        Ok(inserted)
    }

    async fn delete_many(&self, collection: &str, filter: Filter) -> StoreResult<usize> {
        let mut collections = self.collections.write().await;
        let Some(stored) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = stored.documents.len();
        stored.documents.retain(|d| !filter.matches(d));
        Ok(before - stored.documents.len())
    }

    async fn create_unique_index(&self, collection: &str, field: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let stored = collections.entry(collection.to_string()).or_default();
        if stored.unique_fields.iter().any(|f| f == field) {
            return Ok(());
        }

        let candidate = Collection {
            documents: Vec::new(),
            unique_fields: vec![field.to_string()],
        };
        candidate.check_unique(collection, &stored.documents)?;
        stored.unique_fields.push(field.to_string());
        Ok(())
    }

    async fn flush(&self) -> StoreResult<()> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };

        let collections = self.collections.read().await;
        for (name, stored) in collections.iter() {
            JsonlSnapshot::new(dir, name).write(&stored.documents).await?;
            debug!(collection = %name, documents = stored.documents.len(), "Flushed snapshot");
        }
        Ok(())
    }
}

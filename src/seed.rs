use crate::api::AppState;
use crate::config::SeedConfig;
use crate::repository::{DEALERSHIPS, REVIEWS, RepositoryError};
use crate::storage::{Document, DocumentStore, Filter};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Fixture file locations
#[derive(Debug, Clone)]
pub struct FixturePaths {
    pub dealerships: PathBuf,
    pub reviews: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read fixture {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed fixture {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("record {index} of fixture {} has no integer id", .path.display())]
    MissingId { path: PathBuf, index: usize },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Fixture records are stored as written; only their `id` is checked.
#[derive(Deserialize)]
struct DealershipFixture {
    dealerships: Vec<Document>,
}

#[derive(Deserialize)]
struct ReviewFixture {
    reviews: Vec<Document>,
}

/// Outcome of seeding one collection
#[derive(Debug)]
pub enum SeedOutcome {
    Seeded { deleted: usize, inserted: usize },
    Failed(SeedError),
}

impl SeedOutcome {
    pub fn is_seeded(&self) -> bool {
        matches!(self, SeedOutcome::Seeded { .. })
    }
}

#[derive(Debug)]
pub struct SeedReport {
    pub dealerships: SeedOutcome,
    pub reviews: SeedOutcome,
}

impl SeedReport {
    pub fn is_complete(&self) -> bool {
        self.dealerships.is_seeded() && self.reviews.is_seeded()
    }
}

/// Replace both collections with the fixture contents.
///
/// Collections are seeded independently and concurrently; a failure in one
/// is logged and leaves the other untouched. Never fails as a whole.
pub async fn seed<S: DocumentStore>(store: &S, paths: &FixturePaths) -> SeedReport {
    let (dealerships, reviews) = tokio::join!(
        seed_collection(store, DEALERSHIPS, &paths.dealerships, |f: DealershipFixture| {
            f.dealerships
        }),
        seed_collection(store, REVIEWS, &paths.reviews, |f: ReviewFixture| f.reviews),
    );

    SeedReport {
        dealerships,
        reviews,
    }
}

async fn seed_collection<S, F, E>(
    store: &S,
    collection: &'static str,
    path: &Path,
    extract: E,
) -> SeedOutcome
where
    S: DocumentStore,
    F: DeserializeOwned,
    E: FnOnce(F) -> Vec<Document>,
{
    match load_and_replace(store, collection, path, extract).await {
        Ok((deleted, inserted)) => {
            info!(collection, deleted, inserted, "Collection seeded");
            SeedOutcome::Seeded { deleted, inserted }
        }
        Err(e) => {
            error!(collection, error = %e, "Seeding failed");
            SeedOutcome::Failed(e)
        }
    }
}

async fn load_and_replace<S, F, E>(
    store: &S,
    collection: &str,
    path: &Path,
    extract: E,
) -> Result<(usize, usize), SeedError>
where
    S: DocumentStore,
    F: DeserializeOwned,
    E: FnOnce(F) -> Vec<Document>,
{
    let documents = extract(read_fixture(path).await?);
    if let Some(index) = documents
        .iter()
        .position(|d| !d.get("id").is_some_and(|id| id.is_i64()))
    {
        return Err(SeedError::MissingId {
            path: path.to_path_buf(),
            index,
        });
    }
    replace_collection(store, collection, documents).await
}

/// Delete everything in `collection`, then bulk-insert `documents`.
pub async fn replace_collection<S: DocumentStore>(
    store: &S,
    collection: &str,
    documents: Vec<Document>,
) -> Result<(usize, usize), SeedError> {
    let deleted = store
        .delete_many(collection, Filter::all())
        .await
        .map_err(RepositoryError::from)?;
    let inserted = store
        .insert_many(collection, documents)
        .await
        .map_err(RepositoryError::from)?;
    Ok((deleted, inserted))
}

async fn read_fixture<F: DeserializeOwned>(path: &Path) -> Result<F, SeedError> {
    let raw = tokio::fs::read(path).await.map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Run startup seeding as configured and mark `state` seeded when done.
///
/// Disabled seeding marks the state seeded straight away. With
/// `wait_for_completion` the fixtures are loaded before this returns;
/// otherwise seeding runs on a spawned task whose handle is returned.
pub async fn start<S: DocumentStore>(
    state: &AppState<S>,
    config: &SeedConfig,
) -> Option<JoinHandle<SeedReport>> {
    if !config.enabled {
        info!("⏭️  Seeding disabled");
        state.mark_seeded();
        return None;
    }

    let paths = config.fixture_paths();
    if config.wait_for_completion {
        info!("🌱 Seeding collections...");
        let report = seed(state.store.as_ref(), &paths).await;
        state.mark_seeded();
        if report.is_complete() {
            info!("✅ Seeding complete");
        } else {
            warn!("⚠️  Seeding incomplete, serving whatever data survived");
        }
        return None;
    }

    info!("🌱 Seeding collections in the background");
    let state = state.clone();
    Some(tokio::spawn(async move {
        let report = seed(state.store.as_ref(), &paths).await;
        state.mark_seeded();
        info!(complete = report.is_complete(), "Background seeding finished");
        report
    }))
}

use std::fs;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::info;
use uuid::Uuid;

use crate::config::{AppConfig, DEFAULT_TOP_LIMIT};
use crate::error::{FixbaseError, Result};
use crate::filter::{NormalizedQuery, Searchable, normalize_query, record_matches};
use crate::models::{ListQuery, Ranking, StorageScope};
use crate::rank::{Ranked, rank_records, truncate};
use crate::storage::{RemoteStore, SqliteStore, StorageBackend, StorageKind};
use crate::text::is_blank;

mod comment_service;
mod issue_service;
mod problem_service;
mod seed_service;

#[cfg(test)]
mod tests;

/// Repository over one injected storage backend.
///
/// Every listing, submission and upvote goes through here so that validation, identifier
/// assignment, filtering and ranking behave the same whichever backend is plugged in.
#[derive(Clone)]
pub struct KnowledgeBase {
    storage: Arc<dyn StorageBackend>,
    top_limit: usize,
}

impl std::fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("storage", &self.storage.kind())
            .field("top_limit", &self.top_limit)
            .finish()
    }
}

impl KnowledgeBase {
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            storage,
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }

    /// Composes the knowledge base with the backend selected by `config`.
    pub fn open(config: &AppConfig) -> Result<Self> {
        let storage: Arc<dyn StorageBackend> = match config.storage {
            StorageKind::Local => {
                fs::create_dir_all(&config.root)?;
                Arc::new(SqliteStore::open(config.database_path())?)
            }
            StorageKind::Remote => Arc::new(RemoteStore::new(config.remote_config()?)?),
        };
        info!(storage = %config.storage, root = %config.root.display(), "knowledge base opened");
        Ok(Self::new(storage).with_top_limit(config.top_limit))
    }

    #[must_use]
    pub fn with_top_limit(mut self, top_limit: usize) -> Self {
        self.top_limit = top_limit.max(1);
        self
    }

    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    pub fn top_limit(&self) -> usize {
        self.top_limit
    }

    pub(crate) fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }
}

/// Filter, rank, then truncate one listing. `fetch` receives the predicates the backend may
/// evaluate itself; the full filter is re-applied here regardless.
pub(crate) fn run_listing<T, F>(query: &ListQuery, default_ranking: Ranking, fetch: F) -> Result<Vec<T>>
where
    T: Searchable + Ranked,
    F: FnOnce(&StorageScope) -> Result<Vec<T>>,
{
    let normalized: Option<NormalizedQuery> = normalize_query(query);
    if normalized.as_ref().is_some_and(NormalizedQuery::matches_nothing) {
        return Ok(Vec::new());
    }
    let scope = normalized
        .as_ref()
        .map(NormalizedQuery::storage_scope)
        .unwrap_or_default();

    let mut records = fetch(&scope)?;
    if let Some(normalized) = &normalized {
        records.retain(|record| record_matches(record, normalized));
    }
    rank_records(&mut records, query.sort.unwrap_or(default_ranking));
    Ok(truncate(records, query.limit))
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current time at the precision the stores keep, so returned records equal re-read ones.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<()> {
    if is_blank(value) {
        return Err(FixbaseError::Validation(format!("{field} is required")));
    }
    Ok(())
}

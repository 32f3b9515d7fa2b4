//! Storage backends behind the knowledge base.
//!
//! Exactly one backend is chosen when the [`KnowledgeBase`](crate::KnowledgeBase) is composed:
//! the local SQLite file or a hosted REST database. Backends only persist and fetch; identifiers,
//! timestamps, validation, filtering and ranking all happen above them so both behave the same.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FixbaseError, Result};
use crate::models::{Answer, Comment, Issue, Problem, StorageScope};

mod remote;
mod sqlite;

pub use remote::{RemoteConfig, RemoteStore};
pub use sqlite::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Local,
    Remote,
}

impl StorageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKind {
    type Err = FixbaseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "sqlite" => Ok(Self::Local),
            "remote" | "rest" => Ok(Self::Remote),
            other => Err(FixbaseError::Config(format!(
                "unknown storage backend '{other}', expected local or remote"
            ))),
        }
    }
}

/// Record collections persisted by a backend.
///
/// Lookups return `Ok(None)` for unknown identifiers; the caller decides whether that is an error.
/// Upvote writes store the count they are given: there is no compare-and-swap, so two writers
/// working from the same snapshot overwrite each other.
pub trait StorageBackend: Send + Sync {
    fn kind(&self) -> StorageKind;

    fn list_issues(&self, scope: &StorageScope) -> Result<Vec<Issue>>;
    fn get_issue(&self, id: &str) -> Result<Option<Issue>>;
    fn insert_issue(&self, issue: &Issue) -> Result<Issue>;
    fn set_issue_upvotes(&self, id: &str, upvotes: u32) -> Result<Option<Issue>>;
    fn count_issues(&self) -> Result<usize>;

    fn list_comments(&self, issue_id: &str) -> Result<Vec<Comment>>;
    fn insert_comment(&self, comment: &Comment) -> Result<Comment>;

    fn list_problems(&self, scope: &StorageScope) -> Result<Vec<Problem>>;
    fn get_problem(&self, id: &str) -> Result<Option<Problem>>;
    fn insert_problem(&self, problem: &Problem) -> Result<Problem>;
    fn set_problem_upvotes(&self, id: &str, upvotes: u32) -> Result<Option<Problem>>;

    fn list_answers(&self, problem_id: &str) -> Result<Vec<Answer>>;
    fn insert_answer(&self, answer: &Answer) -> Result<Answer>;
}

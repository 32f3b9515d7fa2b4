//! Core of the fixbase Linux troubleshooting knowledge base.
//!
//! [`KnowledgeBase`] is the single entry point: it filters and ranks issue and problem
//! listings, validates and stores submissions, and applies upvotes, on top of whichever
//! [`storage::StorageBackend`] it was composed with.

// Public fallible APIs in this crate share one concrete error contract (`FixbaseError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod rank;
pub mod storage;
pub mod text;
pub mod vote;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::KnowledgeBase;
pub use config::AppConfig;
pub use error::{FixbaseError, Result};
pub use vote::{VoteOutcome, VoteSession, VoteTarget};

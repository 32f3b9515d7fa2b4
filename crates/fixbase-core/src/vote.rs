//! Per-session duplicate-vote guard.
//!
//! The guard lives only as long as the session value: nothing is persisted, and the server-side
//! upvote operations never consult it. Dropping the session (a reload, another device) forgets
//! every vote it recorded.

use std::collections::HashSet;

use crate::client::KnowledgeBase;
use crate::error::Result;
use crate::models::{Issue, Problem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteTarget {
    Issue,
    Problem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome<T> {
    Counted(T),
    /// Refused locally; storage was not contacted.
    AlreadyVoted,
}

#[derive(Debug)]
pub struct VoteSession {
    kb: KnowledgeBase,
    voted: HashSet<(VoteTarget, String)>,
}

impl VoteSession {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self {
            kb,
            voted: HashSet::new(),
        }
    }

    pub fn has_voted(&self, target: VoteTarget, id: &str) -> bool {
        self.voted.contains(&(target, id.to_string()))
    }

    /// Submits the displayed count plus one as the new absolute count.
    pub fn upvote_issue(&mut self, id: &str) -> Result<VoteOutcome<Issue>> {
        if self.has_voted(VoteTarget::Issue, id) {
            return Ok(VoteOutcome::AlreadyVoted);
        }
        let shown = self.kb.get_issue(id)?;
        let updated = self
            .kb
            .set_issue_upvotes(id, shown.upvotes.saturating_add(1))?;
        self.voted.insert((VoteTarget::Issue, id.to_string()));
        Ok(VoteOutcome::Counted(updated))
    }

    pub fn upvote_problem(&mut self, id: &str) -> Result<VoteOutcome<Problem>> {
        if self.has_voted(VoteTarget::Problem, id) {
            return Ok(VoteOutcome::AlreadyVoted);
        }
        let updated = self.kb.upvote_problem(id)?;
        self.voted.insert((VoteTarget::Problem, id.to_string()));
        Ok(VoteOutcome::Counted(updated))
    }
}

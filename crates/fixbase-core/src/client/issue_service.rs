use tracing::{info, warn};

use super::{KnowledgeBase, new_id, now, require_text, run_listing};
use crate::error::{FixbaseError, Result};
use crate::models::{Issue, IssueDraft, ListQuery, Ranking};
use crate::text::normalize_entries;

impl KnowledgeBase {
    /// Issues matching `query`, newest first unless the query picks another ranking.
    pub fn list_issues(&self, query: &ListQuery) -> Result<Vec<Issue>> {
        run_listing(query, Ranking::Latest, |scope| {
            self.storage().list_issues(scope)
        })
    }

    /// Most upvoted issues matching `query`, capped at the configured top limit unless the
    /// query sets its own.
    pub fn top_issues(&self, query: &ListQuery) -> Result<Vec<Issue>> {
        let mut query = query.clone();
        query.sort = Some(Ranking::Top);
        query.limit = Some(query.limit.unwrap_or(self.top_limit()));
        self.list_issues(&query)
    }

    pub fn get_issue(&self, id: &str) -> Result<Issue> {
        self.storage()
            .get_issue(id)?
            .ok_or_else(|| FixbaseError::NotFound(format!("issue {id}")))
    }

    pub fn submit_issue(&self, draft: IssueDraft) -> Result<Issue> {
        validate_issue_draft(&draft).inspect_err(|err| {
            warn!(error = %err, "issue submission rejected");
        })?;

        let issue = Issue {
            id: new_id(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            distro: draft.distro,
            category: draft.category.trim().to_string(),
            tags: normalize_entries(&draft.tags),
            steps_to_fix: draft.steps_to_fix.trim().to_string(),
            commands: normalize_entries(&draft.commands),
            upvotes: 0,
            created_at: now(),
        };
        let stored = self.storage().insert_issue(&issue)?;
        info!(issue_id = %stored.id, category = %stored.category, distro = %stored.distro, "issue submitted");
        Ok(stored)
    }

    /// Stores a caller-computed absolute count. Two callers sending the same `current + 1`
    /// both succeed and one increment is lost.
    pub fn set_issue_upvotes(&self, id: &str, upvotes: u32) -> Result<Issue> {
        let updated = self
            .storage()
            .set_issue_upvotes(id, upvotes)?
            .ok_or_else(|| FixbaseError::NotFound(format!("issue {id}")))?;
        info!(issue_id = %id, upvotes, "issue upvotes set");
        Ok(updated)
    }

    /// Reads the current count and writes it back moved by `delta`, never below zero.
    pub fn adjust_issue_upvotes(&self, id: &str, delta: i64) -> Result<Issue> {
        let current = self.get_issue(id)?;
        let next = (i64::from(current.upvotes) + delta).clamp(0, i64::from(u32::MAX));
        let next = u32::try_from(next).unwrap_or(u32::MAX);
        self.set_issue_upvotes(id, next)
    }

    pub fn upvote_issue(&self, id: &str) -> Result<Issue> {
        self.adjust_issue_upvotes(id, 1)
    }
}

fn validate_issue_draft(draft: &IssueDraft) -> Result<()> {
    require_text("title", &draft.title)?;
    require_text("description", &draft.description)?;
    require_text("category", &draft.category)?;
    require_text("stepsToFix", &draft.steps_to_fix)?;
    Ok(())
}

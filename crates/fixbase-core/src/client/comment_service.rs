use tracing::{info, warn};

use super::{KnowledgeBase, new_id, now, require_text};
use crate::error::Result;
use crate::models::{Comment, CommentDraft};
use crate::rank::rank_comments;

impl KnowledgeBase {
    /// Comments on an issue, oldest first. Unknown issues simply have none.
    pub fn list_comments(&self, issue_id: &str) -> Result<Vec<Comment>> {
        let mut comments = self.storage().list_comments(issue_id)?;
        rank_comments(&mut comments);
        Ok(comments)
    }

    /// Blank author or text is rejected before storage is touched.
    pub fn add_comment(&self, draft: CommentDraft) -> Result<Comment> {
        validate_comment(&draft).inspect_err(|err| {
            warn!(error = %err, "comment rejected");
        })?;
        let issue = self.get_issue(draft.issue_id.trim())?;

        let comment = Comment {
            id: new_id(),
            issue_id: issue.id,
            author: draft.author.trim().to_string(),
            text: draft.text.trim().to_string(),
            created_at: now(),
        };
        let stored = self.storage().insert_comment(&comment)?;
        info!(issue_id = %stored.issue_id, comment_id = %stored.id, "comment added");
        Ok(stored)
    }
}

fn validate_comment(draft: &CommentDraft) -> Result<()> {
    require_text("issueId", &draft.issue_id)?;
    require_text("author", &draft.author)?;
    require_text("text", &draft.text)?;
    Ok(())
}

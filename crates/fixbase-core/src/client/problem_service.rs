use tracing::{info, warn};

use super::{KnowledgeBase, new_id, now, require_text, run_listing};
use crate::error::{FixbaseError, Result};
use crate::models::{Answer, AnswerDraft, ListQuery, Problem, ProblemDraft, Ranking, UserId};
use crate::rank::rank_answers;
use crate::text::normalize_entries;

impl KnowledgeBase {
    pub fn list_problems(&self, query: &ListQuery) -> Result<Vec<Problem>> {
        run_listing(query, Ranking::Latest, |scope| {
            self.storage().list_problems(scope)
        })
    }

    pub fn get_problem(&self, id: &str) -> Result<Problem> {
        self.storage()
            .get_problem(id)?
            .ok_or_else(|| FixbaseError::NotFound(format!("problem {id}")))
    }

    pub fn ask_problem(&self, caller: Option<&UserId>, draft: ProblemDraft) -> Result<Problem> {
        let owner = require_caller(caller, "asking a problem")?;
        validate_problem_draft(&draft).inspect_err(|err| {
            warn!(error = %err, "problem rejected");
        })?;

        let problem = Problem {
            id: new_id(),
            title: draft.title.trim().to_string(),
            description: draft.description.trim().to_string(),
            distro: draft.distro,
            category: draft.category.trim().to_string(),
            tags: normalize_entries(&draft.tags),
            upvotes: 0,
            created_at: now(),
            user_id: owner.clone(),
        };
        let stored = self.storage().insert_problem(&problem)?;
        info!(problem_id = %stored.id, user_id = %stored.user_id, "problem asked");
        Ok(stored)
    }

    /// Read-then-write increment by exactly one; concurrent upvotes may overwrite each other.
    pub fn upvote_problem(&self, id: &str) -> Result<Problem> {
        let current = self.get_problem(id)?;
        let updated = self
            .storage()
            .set_problem_upvotes(id, current.upvotes.saturating_add(1))?
            .ok_or_else(|| FixbaseError::NotFound(format!("problem {id}")))?;
        info!(problem_id = %id, upvotes = updated.upvotes, "problem upvoted");
        Ok(updated)
    }

    /// Answers to a problem, accepted first and then by upvotes.
    pub fn list_answers(&self, problem_id: &str) -> Result<Vec<Answer>> {
        let mut answers = self.storage().list_answers(problem_id)?;
        rank_answers(&mut answers);
        Ok(answers)
    }

    pub fn add_answer(
        &self,
        caller: Option<&UserId>,
        problem_id: &str,
        draft: AnswerDraft,
    ) -> Result<Answer> {
        let author = require_caller(caller, "answering a problem")?;
        require_text("content", &draft.content).inspect_err(|err| {
            warn!(error = %err, "answer rejected");
        })?;
        let problem = self.get_problem(problem_id)?;

        let answer = Answer {
            id: new_id(),
            problem_id: problem.id,
            user_id: author.clone(),
            content: draft.content.trim().to_string(),
            upvotes: 0,
            is_accepted: false,
            created_at: now(),
        };
        let stored = self.storage().insert_answer(&answer)?;
        info!(problem_id = %stored.problem_id, answer_id = %stored.id, "answer added");
        Ok(stored)
    }
}

fn require_caller<'a>(caller: Option<&'a UserId>, action: &str) -> Result<&'a UserId> {
    caller.ok_or_else(|| {
        warn!(action, "unauthenticated write refused");
        FixbaseError::Unauthorized(format!("sign in before {action}"))
    })
}

fn validate_problem_draft(draft: &ProblemDraft) -> Result<()> {
    require_text("title", &draft.title)?;
    require_text("description", &draft.description)?;
    require_text("category", &draft.category)?;
    Ok(())
}

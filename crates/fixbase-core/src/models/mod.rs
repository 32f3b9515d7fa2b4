mod distro;
mod issue;
mod problem;
mod query;

pub use distro::{CATEGORIES, Distro};
pub use issue::{Comment, CommentDraft, Issue, IssueDraft, IssueForm};
pub use problem::{Answer, AnswerDraft, Problem, ProblemDraft, UserId};
pub use query::{ListQuery, Ranking, StorageScope};

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MetaResponse {
    pub categories: Vec<&'static str>,
    pub distros: Vec<&'static str>,
}

impl MetaResponse {
    #[must_use]
    pub fn current() -> Self {
        Self {
            categories: CATEGORIES.to_vec(),
            distros: Distro::ALL.iter().map(|distro| distro.as_str()).collect(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Distro;
use crate::text::{parse_commands, parse_tags};

/// A published troubleshooting article: a Linux problem plus the steps and commands that fix it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    pub description: String,
    pub distro: Distro,
    pub category: String,
    pub tags: Vec<String>,
    pub steps_to_fix: String,
    pub commands: Vec<String>,
    pub upvotes: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub issue_id: String,
    pub author: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Submission payload for a new issue. Missing text fields deserialize as empty
/// strings so that validation, not decoding, reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub distro: Distro,
    pub category: String,
    pub tags: Vec<String>,
    pub steps_to_fix: String,
    pub commands: Vec<String>,
}

/// Issue submission as typed into a form: tags comma-separated, commands one per line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueForm {
    pub title: String,
    pub description: String,
    pub distro: Distro,
    pub category: String,
    pub tags_text: String,
    pub steps_to_fix: String,
    pub commands_text: String,
}

impl IssueForm {
    #[must_use]
    pub fn into_draft(self) -> IssueDraft {
        IssueDraft {
            title: self.title,
            description: self.description,
            distro: self.distro,
            category: self.category,
            tags: parse_tags(&self.tags_text),
            steps_to_fix: self.steps_to_fix,
            commands: parse_commands(&self.commands_text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentDraft {
    pub issue_id: String,
    pub author: String,
    pub text: String,
}

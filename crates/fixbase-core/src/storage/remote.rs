use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::sqlite::stored_upvotes;
use super::{StorageBackend, StorageKind};
use crate::error::{FixbaseError, Result};
use crate::models::{Answer, Comment, Distro, Issue, Problem, StorageScope, UserId};


const ISSUES: &str = "issues";
const COMMENTS: &str = "comments";
const PROBLEMS: &str = "problems";
const ANSWERS: &str = "answers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_ms: u64,
}

impl RemoteConfig {
    pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            api_key: None,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
        }
    }
}

/// Hosted database reached through a PostgREST-style API (`/rest/v1/<table>`).
#[derive(Clone)]
pub struct RemoteStore {
    config: RemoteConfig,
    http: Client,
}

impl std::fmt::Debug for RemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteStore")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteStore {
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| FixbaseError::Config(format!("invalid remote api key: {e}")))?;
            let bearer = HeaderValue::from_str(&format!("Bearer {key}"))
                .map_err(|e| FixbaseError::Config(format!("invalid remote api key: {e}")))?;
            headers.insert("apikey", value);
            headers.insert(reqwest::header::AUTHORIZATION, bearer);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self { config, http })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.base_url)
    }

    fn select<T: DeserializeOwned>(&self, table: &str, params: &[(String, String)]) -> Result<Vec<T>> {
        let request = self.http.get(self.table_url(table)).query(params);
        read_rows(send(request)?)
    }

    fn insert<R: Serialize, T: DeserializeOwned>(&self, table: &str, row: &R) -> Result<T> {
        let request = self
            .http
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(&[row]);
        first_row(read_rows(send(request)?)?, table)
    }

    fn update_upvotes<T: DeserializeOwned>(&self, table: &str, id: &str, upvotes: u32) -> Result<Option<T>> {
        let request = self
            .http
            .patch(self.table_url(table))
            .query(&id_params(id))
            .header("Prefer", "return=representation")
            .json(&json!({ "upvotes": upvotes }));
        Ok(read_rows(send(request)?)?.into_iter().next())
    }
}

impl StorageBackend for RemoteStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Remote
    }

    fn list_issues(&self, scope: &StorageScope) -> Result<Vec<Issue>> {
        self.select::<IssueRow>(ISSUES, &scope_params(scope))?
            .into_iter()
            .map(IssueRow::into_issue)
            .collect()
    }

    fn get_issue(&self, id: &str) -> Result<Option<Issue>> {
        self.select::<IssueRow>(ISSUES, &id_params(id))?
            .into_iter()
            .next()
            .map(IssueRow::into_issue)
            .transpose()
    }

    fn insert_issue(&self, issue: &Issue) -> Result<Issue> {
        self.insert::<_, IssueRow>(ISSUES, &IssueRow::from(issue))?
            .into_issue()
    }

    fn set_issue_upvotes(&self, id: &str, upvotes: u32) -> Result<Option<Issue>> {
        self.update_upvotes::<IssueRow>(ISSUES, id, upvotes)?
            .map(IssueRow::into_issue)
            .transpose()
    }

    fn count_issues(&self) -> Result<usize> {
        let params = vec![("select".to_string(), "id".to_string())];
        Ok(self.select::<serde_json::Value>(ISSUES, &params)?.len())
    }

    fn list_comments(&self, issue_id: &str) -> Result<Vec<Comment>> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            ("issue_id".to_string(), format!("eq.{issue_id}")),
            ("order".to_string(), "created_at.asc".to_string()),
        ];
        Ok(self
            .select::<CommentRow>(COMMENTS, &params)?
            .into_iter()
            .map(Comment::from)
            .collect())
    }

    fn insert_comment(&self, comment: &Comment) -> Result<Comment> {
        let row: CommentRow = self.insert(COMMENTS, &CommentRow::from(comment))?;
        Ok(row.into())
    }

    fn list_problems(&self, scope: &StorageScope) -> Result<Vec<Problem>> {
        self.select::<ProblemRow>(PROBLEMS, &scope_params(scope))?
            .into_iter()
            .map(ProblemRow::into_problem)
            .collect()
    }

    fn get_problem(&self, id: &str) -> Result<Option<Problem>> {
        self.select::<ProblemRow>(PROBLEMS, &id_params(id))?
            .into_iter()
            .next()
            .map(ProblemRow::into_problem)
            .transpose()
    }

    fn insert_problem(&self, problem: &Problem) -> Result<Problem> {
        self.insert::<_, ProblemRow>(PROBLEMS, &ProblemRow::from(problem))?
            .into_problem()
    }

    fn set_problem_upvotes(&self, id: &str, upvotes: u32) -> Result<Option<Problem>> {
        self.update_upvotes::<ProblemRow>(PROBLEMS, id, upvotes)?
            .map(ProblemRow::into_problem)
            .transpose()
    }

    fn list_answers(&self, problem_id: &str) -> Result<Vec<Answer>> {
        let params = vec![
            ("select".to_string(), "*".to_string()),
            ("problem_id".to_string(), format!("eq.{problem_id}")),
        ];
        Ok(self
            .select::<AnswerRow>(ANSWERS, &params)?
            .into_iter()
            .map(Answer::from)
            .collect())
    }

    fn insert_answer(&self, answer: &Answer) -> Result<Answer> {
        let row: AnswerRow = self.insert(ANSWERS, &AnswerRow::from(answer))?;
        Ok(row.into())
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send()?;
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().unwrap_or_default();
    Err(FixbaseError::Storage(remote_error_message(status.as_u16(), &body)))
}

fn read_rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>> {
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

fn first_row<T>(rows: Vec<T>, table: &str) -> Result<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| FixbaseError::Storage(format!("insert into {table} returned no rows")))
}

/// Prefers the service's own `message` field so its wording reaches the caller unchanged.
pub(super) fn remote_error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(|message| message.as_str())
                .map(ToString::to_string)
        })
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("remote storage responded with status {status}"))
}

pub(super) fn id_params(id: &str) -> Vec<(String, String)> {
    vec![
        ("select".to_string(), "*".to_string()),
        ("id".to_string(), format!("eq.{id}")),
    ]
}

pub(super) fn scope_params(scope: &StorageScope) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    if let Some(category) = &scope.category {
        params.push(("category".to_string(), format!("eq.{category}")));
    }
    if let Some(distro) = scope.distro {
        params.push(("distro".to_string(), format!("eq.{distro}")));
    }
    params.push(("order".to_string(), "created_at.desc".to_string()));
    params
}

fn remote_distro(raw: &str) -> Result<Distro> {
    Distro::parse(raw)
        .ok_or_else(|| FixbaseError::Storage(format!("remote record has unknown distro: {raw}")))
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct IssueRow {
    id: String,
    title: String,
    description: String,
    distro: String,
    category: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    steps_to_fix: String,
    #[serde(default)]
    commands: Vec<String>,
    #[serde(default)]
    upvotes: i64,
    created_at: DateTime<Utc>,
}

impl From<&Issue> for IssueRow {
    fn from(issue: &Issue) -> Self {
        Self {
            id: issue.id.clone(),
            title: issue.title.clone(),
            description: issue.description.clone(),
            distro: issue.distro.to_string(),
            category: issue.category.clone(),
            tags: issue.tags.clone(),
            steps_to_fix: issue.steps_to_fix.clone(),
            commands: issue.commands.clone(),
            upvotes: i64::from(issue.upvotes),
            created_at: issue.created_at,
        }
    }
}

impl IssueRow {
    pub(super) fn into_issue(self) -> Result<Issue> {
        Ok(Issue {
            distro: remote_distro(&self.distro)?,
            upvotes: stored_upvotes(self.upvotes),
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            tags: self.tags,
            steps_to_fix: self.steps_to_fix,
            commands: self.commands,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CommentRow {
    id: String,
    issue_id: String,
    author: String,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentRow {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            issue_id: comment.issue_id.clone(),
            author: comment.author.clone(),
            text: comment.text.clone(),
            created_at: comment.created_at,
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            issue_id: row.issue_id,
            author: row.author,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProblemRow {
    id: String,
    title: String,
    description: String,
    distro: String,
    category: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    upvotes: i64,
    created_at: DateTime<Utc>,
    user_id: String,
}

impl From<&Problem> for ProblemRow {
    fn from(problem: &Problem) -> Self {
        Self {
            id: problem.id.clone(),
            title: problem.title.clone(),
            description: problem.description.clone(),
            distro: problem.distro.to_string(),
            category: problem.category.clone(),
            tags: problem.tags.clone(),
            upvotes: i64::from(problem.upvotes),
            created_at: problem.created_at,
            user_id: problem.user_id.0.clone(),
        }
    }
}

impl ProblemRow {
    fn into_problem(self) -> Result<Problem> {
        Ok(Problem {
            distro: remote_distro(&self.distro)?,
            upvotes: stored_upvotes(self.upvotes),
            user_id: UserId(self.user_id),
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            tags: self.tags,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct AnswerRow {
    id: String,
    problem_id: String,
    user_id: String,
    content: String,
    #[serde(default)]
    upvotes: i64,
    #[serde(default)]
    is_accepted: bool,
    created_at: DateTime<Utc>,
}

impl From<&Answer> for AnswerRow {
    fn from(answer: &Answer) -> Self {
        Self {
            id: answer.id.clone(),
            problem_id: answer.problem_id.clone(),
            user_id: answer.user_id.0.clone(),
            content: answer.content.clone(),
            upvotes: i64::from(answer.upvotes),
            is_accepted: answer.is_accepted,
            created_at: answer.created_at,
        }
    }
}

impl From<AnswerRow> for Answer {
    fn from(row: AnswerRow) -> Self {
        Self {
            id: row.id,
            problem_id: row.problem_id,
            user_id: UserId(row.user_id),
            content: row.content,
            upvotes: stored_upvotes(row.upvotes),
            is_accepted: row.is_accepted,
            created_at: row.created_at,
        }
    }
}

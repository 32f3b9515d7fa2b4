use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter, types::Value};

use super::{StorageBackend, StorageKind};
use crate::error::{FixbaseError, Result, poisoned};
use crate::models::{Answer, Comment, Distro, Issue, Problem, StorageScope, UserId};

#[cfg(test)]
mod tests;

const ISSUE_COLUMNS: &str = "id, title, description, distro, category, tags_json, steps_to_fix, commands_json, upvotes, created_at";
const COMMENT_COLUMNS: &str = "id, issue_id, author, text, created_at";
const PROBLEM_COLUMNS: &str =
    "id, title, description, distro, category, tags_json, upvotes, created_at, user_id";
const ANSWER_COLUMNS: &str = "id, problem_id, user_id, content, upvotes, is_accepted, created_at";

/// Local persistent store backed by a single SQLite file.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| poisoned())
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS issues (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                distro TEXT NOT NULL,
                category TEXT NOT NULL,
                tags_json TEXT NOT NULL,
                steps_to_fix TEXT NOT NULL,
                commands_json TEXT NOT NULL,
                upvotes INTEGER NOT NULL DEFAULT 0 CHECK (upvotes >= 0),
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS comments (
                id TEXT PRIMARY KEY,
                issue_id TEXT NOT NULL,
                author TEXT NOT NULL,
                text TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (issue_id) REFERENCES issues(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS problems (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                distro TEXT NOT NULL,
                category TEXT NOT NULL,
                tags_json TEXT NOT NULL,
                upvotes INTEGER NOT NULL DEFAULT 0 CHECK (upvotes >= 0),
                created_at TEXT NOT NULL,
                user_id TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS answers (
                id TEXT PRIMARY KEY,
                problem_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                content TEXT NOT NULL,
                upvotes INTEGER NOT NULL DEFAULT 0 CHECK (upvotes >= 0),
                is_accepted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                FOREIGN KEY (problem_id) REFERENCES problems(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_issues_category ON issues(category);
            CREATE INDEX IF NOT EXISTS idx_issues_distro ON issues(distro);
            CREATE INDEX IF NOT EXISTS idx_comments_issue_id ON comments(issue_id);
            CREATE INDEX IF NOT EXISTS idx_problems_category ON problems(category);
            CREATE INDEX IF NOT EXISTS idx_answers_problem_id ON answers(problem_id);
            "#,
        )?;
        Ok(())
    }
}

impl StorageBackend for SqliteStore {
    fn kind(&self) -> StorageKind {
        StorageKind::Local
    }

    fn list_issues(&self, scope: &StorageScope) -> Result<Vec<Issue>> {
        let conn = self.lock()?;
        let (clause, values) = scope_clause(scope);
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues{clause} ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), read_issue_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(IssueRow::into_issue).collect()
    }

    fn get_issue(&self, id: &str) -> Result<Option<Issue>> {
        let conn = self.lock()?;
        query_issue(&conn, id)
    }

    fn insert_issue(&self, issue: &Issue) -> Result<Issue> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO issues(id, title, description, distro, category, tags_json,
                               steps_to_fix, commands_json, upvotes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                issue.id,
                issue.title,
                issue.description,
                issue.distro.as_str(),
                issue.category,
                serde_json::to_string(&issue.tags)?,
                issue.steps_to_fix,
                serde_json::to_string(&issue.commands)?,
                i64::from(issue.upvotes),
                format_timestamp(issue.created_at),
            ],
        )?;
        query_issue(&conn, &issue.id)?
            .ok_or_else(|| FixbaseError::Internal(format!("inserted issue vanished: {}", issue.id)))
    }

    fn set_issue_upvotes(&self, id: &str, upvotes: u32) -> Result<Option<Issue>> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE issues SET upvotes = ?1 WHERE id = ?2",
            params![i64::from(upvotes), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        query_issue(&conn, id)
    }

    fn count_issues(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM issues", [], |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn list_comments(&self, issue_id: &str) -> Result<Vec<Comment>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE issue_id = ?1 ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![issue_id], read_comment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(CommentRow::into_comment).collect()
    }

    fn insert_comment(&self, comment: &Comment) -> Result<Comment> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO comments(id, issue_id, author, text, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                comment.id,
                comment.issue_id,
                comment.author,
                comment.text,
                format_timestamp(comment.created_at),
            ],
        )?;
        Ok(comment.clone())
    }

    fn list_problems(&self, scope: &StorageScope) -> Result<Vec<Problem>> {
        let conn = self.lock()?;
        let (clause, values) = scope_clause(scope);
        let sql = format!("SELECT {PROBLEM_COLUMNS} FROM problems{clause} ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), read_problem_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(ProblemRow::into_problem).collect()
    }

    fn get_problem(&self, id: &str) -> Result<Option<Problem>> {
        let conn = self.lock()?;
        query_problem(&conn, id)
    }

    fn insert_problem(&self, problem: &Problem) -> Result<Problem> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO problems(id, title, description, distro, category, tags_json,
                                 upvotes, created_at, user_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                problem.id,
                problem.title,
                problem.description,
                problem.distro.as_str(),
                problem.category,
                serde_json::to_string(&problem.tags)?,
                i64::from(problem.upvotes),
                format_timestamp(problem.created_at),
                problem.user_id.as_str(),
            ],
        )?;
        query_problem(&conn, &problem.id)?.ok_or_else(|| {
            FixbaseError::Internal(format!("inserted problem vanished: {}", problem.id))
        })
    }

    fn set_problem_upvotes(&self, id: &str, upvotes: u32) -> Result<Option<Problem>> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE problems SET upvotes = ?1 WHERE id = ?2",
            params![i64::from(upvotes), id],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        query_problem(&conn, id)
    }

    fn list_answers(&self, problem_id: &str) -> Result<Vec<Answer>> {
        let conn = self.lock()?;
        let sql = format!("SELECT {ANSWER_COLUMNS} FROM answers WHERE problem_id = ?1 ORDER BY rowid");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![problem_id], read_answer_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(AnswerRow::into_answer).collect()
    }

    fn insert_answer(&self, answer: &Answer) -> Result<Answer> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO answers(id, problem_id, user_id, content, upvotes, is_accepted, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                answer.id,
                answer.problem_id,
                answer.user_id.as_str(),
                answer.content,
                i64::from(answer.upvotes),
                answer.is_accepted,
                format_timestamp(answer.created_at),
            ],
        )?;
        Ok(answer.clone())
    }
}

fn scope_clause(scope: &StorageScope) -> (String, Vec<Value>) {
    let mut conditions = Vec::new();
    let mut values = Vec::new();
    if let Some(category) = &scope.category {
        values.push(Value::Text(category.clone()));
        conditions.push(format!("category = ?{}", values.len()));
    }
    if let Some(distro) = scope.distro {
        values.push(Value::Text(distro.as_str().to_string()));
        conditions.push(format!("distro = ?{}", values.len()));
    }
    if conditions.is_empty() {
        return (String::new(), values);
    }
    (format!(" WHERE {}", conditions.join(" AND ")), values)
}

fn query_issue(conn: &Connection, id: &str) -> Result<Option<Issue>> {
    let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = ?1");
    conn.query_row(&sql, params![id], read_issue_row)
        .optional()?
        .map(IssueRow::into_issue)
        .transpose()
}

fn query_problem(conn: &Connection, id: &str) -> Result<Option<Problem>> {
    let sql = format!("SELECT {PROBLEM_COLUMNS} FROM problems WHERE id = ?1");
    conn.query_row(&sql, params![id], read_problem_row)
        .optional()?
        .map(ProblemRow::into_problem)
        .transpose()
}

struct IssueRow {
    id: String,
    title: String,
    description: String,
    distro: String,
    category: String,
    tags_json: String,
    steps_to_fix: String,
    commands_json: String,
    upvotes: i64,
    created_at: String,
}

fn read_issue_row(row: &Row<'_>) -> rusqlite::Result<IssueRow> {
    Ok(IssueRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        distro: row.get(3)?,
        category: row.get(4)?,
        tags_json: row.get(5)?,
        steps_to_fix: row.get(6)?,
        commands_json: row.get(7)?,
        upvotes: row.get(8)?,
        created_at: row.get(9)?,
    })
}

impl IssueRow {
    fn into_issue(self) -> Result<Issue> {
        Ok(Issue {
            distro: stored_distro(&self.distro)?,
            tags: serde_json::from_str(&self.tags_json)?,
            commands: serde_json::from_str(&self.commands_json)?,
            upvotes: stored_upvotes(self.upvotes),
            created_at: parse_timestamp(&self.created_at)?,
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            steps_to_fix: self.steps_to_fix,
        })
    }
}

struct CommentRow {
    id: String,
    issue_id: String,
    author: String,
    text: String,
    created_at: String,
}

fn read_comment_row(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        issue_id: row.get(1)?,
        author: row.get(2)?,
        text: row.get(3)?,
        created_at: row.get(4)?,
    })
}

impl CommentRow {
    fn into_comment(self) -> Result<Comment> {
        Ok(Comment {
            created_at: parse_timestamp(&self.created_at)?,
            id: self.id,
            issue_id: self.issue_id,
            author: self.author,
            text: self.text,
        })
    }
}

struct ProblemRow {
    id: String,
    title: String,
    description: String,
    distro: String,
    category: String,
    tags_json: String,
    upvotes: i64,
    created_at: String,
    user_id: String,
}

fn read_problem_row(row: &Row<'_>) -> rusqlite::Result<ProblemRow> {
    Ok(ProblemRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        distro: row.get(3)?,
        category: row.get(4)?,
        tags_json: row.get(5)?,
        upvotes: row.get(6)?,
        created_at: row.get(7)?,
        user_id: row.get(8)?,
    })
}

impl ProblemRow {
    fn into_problem(self) -> Result<Problem> {
        Ok(Problem {
            distro: stored_distro(&self.distro)?,
            tags: serde_json::from_str(&self.tags_json)?,
            upvotes: stored_upvotes(self.upvotes),
            created_at: parse_timestamp(&self.created_at)?,
            user_id: UserId(self.user_id),
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
        })
    }
}

struct AnswerRow {
    id: String,
    problem_id: String,
    user_id: String,
    content: String,
    upvotes: i64,
    is_accepted: bool,
    created_at: String,
}

fn read_answer_row(row: &Row<'_>) -> rusqlite::Result<AnswerRow> {
    Ok(AnswerRow {
        id: row.get(0)?,
        problem_id: row.get(1)?,
        user_id: row.get(2)?,
        content: row.get(3)?,
        upvotes: row.get(4)?,
        is_accepted: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl AnswerRow {
    fn into_answer(self) -> Result<Answer> {
        Ok(Answer {
            upvotes: stored_upvotes(self.upvotes),
            created_at: parse_timestamp(&self.created_at)?,
            user_id: UserId(self.user_id),
            id: self.id,
            problem_id: self.problem_id,
            content: self.content,
            is_accepted: self.is_accepted,
        })
    }
}

fn stored_distro(raw: &str) -> Result<Distro> {
    Distro::parse(raw).ok_or_else(|| FixbaseError::Internal(format!("stored distro is invalid: {raw}")))
}

pub(super) fn stored_upvotes(raw: i64) -> u32 {
    u32::try_from(raw.max(0)).unwrap_or(u32::MAX)
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|err| FixbaseError::Internal(format!("stored timestamp is invalid: {raw}: {err}")))
}

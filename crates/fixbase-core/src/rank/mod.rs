use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::{Answer, Comment, Issue, Problem, Ranking};

#[cfg(test)]
mod tests;

pub trait Ranked {
    fn upvotes(&self) -> u32;
    fn created_at(&self) -> DateTime<Utc>;
}

impl Ranked for Issue {
    fn upvotes(&self) -> u32 {
        self.upvotes
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Ranked for Problem {
    fn upvotes(&self) -> u32 {
        self.upvotes
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Ranked for Answer {
    fn upvotes(&self) -> u32 {
        self.upvotes
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

pub(crate) fn ranking_ordering<T: Ranked>(ranking: Ranking, a: &T, b: &T) -> Ordering {
    match ranking {
        Ranking::Top => b.upvotes().cmp(&a.upvotes()),
        Ranking::Latest => b.created_at().cmp(&a.created_at()),
    }
}

/// Stable sort: records that compare equal keep the order they arrived in.
pub fn rank_records<T: Ranked>(records: &mut [T], ranking: Ranking) {
    records.sort_by(|a, b| ranking_ordering(ranking, a, b));
}

/// Accepted answers first, then by upvotes.
pub fn rank_answers(answers: &mut [Answer]) {
    answers.sort_by(|a, b| {
        b.is_accepted
            .cmp(&a.is_accepted)
            .then_with(|| b.upvotes.cmp(&a.upvotes))
    });
}

/// Conversation order, oldest first.
pub fn rank_comments(comments: &mut [Comment]) {
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}

pub(crate) fn truncate<T>(mut records: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    records
}

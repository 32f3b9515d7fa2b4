use chrono::{DateTime, TimeZone, Utc};

use crate::models::{Answer, Distro, Issue, IssueDraft, Problem, UserId};

pub(crate) fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, day, 12, 0, 0)
        .single()
        .expect("valid fixture date")
}

pub(crate) fn issue(id: &str, title: &str, category: &str, distro: Distro) -> Issue {
    Issue {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        distro,
        category: category.to_string(),
        tags: Vec::new(),
        steps_to_fix: "1. Fix it".to_string(),
        commands: Vec::new(),
        upvotes: 0,
        created_at: day(1),
    }
}

pub(crate) fn problem(id: &str, title: &str, category: &str, distro: Distro) -> Problem {
    Problem {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        distro,
        category: category.to_string(),
        tags: Vec::new(),
        upvotes: 0,
        created_at: day(1),
        user_id: UserId("owner".to_string()),
    }
}

pub(crate) fn answer(id: &str, upvotes: u32, is_accepted: bool) -> Answer {
    Answer {
        id: id.to_string(),
        problem_id: "p1".to_string(),
        user_id: UserId("helper".to_string()),
        content: format!("answer {id}"),
        upvotes,
        is_accepted,
        created_at: day(1),
    }
}

pub(crate) fn issue_draft(title: &str, category: &str) -> IssueDraft {
    IssueDraft {
        title: title.to_string(),
        description: format!("{title} description"),
        distro: Distro::Ubuntu,
        category: category.to_string(),
        tags: Vec::new(),
        steps_to_fix: "1. Do X".to_string(),
        commands: Vec::new(),
    }
}

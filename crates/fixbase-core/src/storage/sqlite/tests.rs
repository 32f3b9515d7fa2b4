use tempfile::tempdir;

use crate::models::{Comment, Distro, StorageScope};
use crate::test_support::{answer, day, issue, problem};

use super::*;

#[test]
fn issues_persist_across_reopen() {
    let temp = tempdir().expect("tempdir");
    let db_path = temp.path().join("fixbase.sqlite3");

    let mut sound = issue("1", "No sound", "Audio", Distro::Ubuntu);
    sound.tags = vec!["audio".to_string(), "alsa".to_string()];
    sound.commands = vec!["aplay -l".to_string()];
    sound.created_at = day(20);
    {
        let store = SqliteStore::open(&db_path).expect("open");
        store.insert_issue(&sound).expect("insert");
    }

    let store = SqliteStore::open(&db_path).expect("reopen");
    let loaded = store.get_issue("1").expect("get").expect("issue exists");
    assert_eq!(loaded, sound);
    assert_eq!(store.count_issues().expect("count"), 1);
}

#[test]
fn list_issues_pushes_down_category_and_distro() {
    let store = SqliteStore::open_in_memory().expect("open");
    store
        .insert_issue(&issue("1", "No sound", "Audio", Distro::Ubuntu))
        .expect("insert 1");
    store
        .insert_issue(&issue("2", "Mic silent", "Audio", Distro::Fedora))
        .expect("insert 2");
    store
        .insert_issue(&issue("3", "WiFi drops", "Networking", Distro::Fedora))
        .expect("insert 3");

    let all = store.list_issues(&StorageScope::default()).expect("list all");
    assert_eq!(all.len(), 3);

    let scope = StorageScope {
        category: Some("Audio".to_string()),
        distro: Some(Distro::Fedora),
    };
    let scoped = store.list_issues(&scope).expect("list scoped");
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].id, "2");
}

#[test]
fn set_upvotes_reports_unknown_ids() {
    let store = SqliteStore::open_in_memory().expect("open");
    store
        .insert_issue(&issue("1", "No sound", "Audio", Distro::Ubuntu))
        .expect("insert");

    let updated = store.set_issue_upvotes("1", 7).expect("update");
    assert_eq!(updated.map(|issue| issue.upvotes), Some(7));
    assert!(store.set_issue_upvotes("missing", 1).expect("update").is_none());
}

#[test]
fn comments_require_an_existing_issue() {
    let store = SqliteStore::open_in_memory().expect("open");
    let orphan = Comment {
        id: "c1".to_string(),
        issue_id: "nope".to_string(),
        author: "tux".to_string(),
        text: "hello".to_string(),
        created_at: day(2),
    };
    assert!(store.insert_comment(&orphan).is_err());

    store
        .insert_issue(&issue("nope", "Now it exists", "Audio", Distro::Ubuntu))
        .expect("insert issue");
    store.insert_comment(&orphan).expect("insert comment");
    let comments = store.list_comments("nope").expect("list comments");
    assert_eq!(comments, vec![orphan]);
}

#[test]
fn problems_and_answers_round_trip() {
    let store = SqliteStore::open_in_memory().expect("open");
    let mut question = problem("p1", "Kernel panic", "System Errors", Distro::Arch);
    question.tags = vec!["kernel".to_string()];
    store.insert_problem(&question).expect("insert problem");

    let accepted = answer("a1", 2, true);
    store.insert_answer(&accepted).expect("insert answer");

    assert_eq!(
        store.get_problem("p1").expect("get problem"),
        Some(question.clone())
    );
    assert_eq!(store.list_answers("p1").expect("list answers"), vec![accepted]);
    assert_eq!(
        store
            .set_problem_upvotes("p1", 3)
            .expect("upvote")
            .map(|p| p.upvotes),
        Some(3)
    );
    let by_distro = StorageScope {
        category: None,
        distro: Some(Distro::Debian),
    };
    assert!(store.list_problems(&by_distro).expect("list").is_empty());
}

#[test]
fn negative_stored_counts_read_as_zero() {
    assert_eq!(stored_upvotes(-4), 0);
    assert_eq!(stored_upvotes(12), 12);
}

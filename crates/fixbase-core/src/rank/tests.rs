use crate::models::{Comment, Distro, Ranking};
use crate::test_support::{answer, day, issue};

use super::*;

#[test]
fn top_ranking_is_non_increasing_and_stable() {
    let mut records = vec![
        issue("a", "A", "Audio", Distro::Ubuntu),
        issue("b", "B", "Audio", Distro::Ubuntu),
        issue("c", "C", "Audio", Distro::Ubuntu),
        issue("d", "D", "Audio", Distro::Ubuntu),
    ];
    records[0].upvotes = 3;
    records[1].upvotes = 12;
    records[2].upvotes = 3;
    records[3].upvotes = 31;

    rank_records(&mut records, Ranking::Top);

    let order: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(order, vec!["d", "b", "a", "c"]);
    assert!(records.windows(2).all(|pair| pair[0].upvotes >= pair[1].upvotes));
}

#[test]
fn latest_ranking_orders_newest_first() {
    let mut records = vec![
        issue("old", "Old", "Audio", Distro::Ubuntu),
        issue("new", "New", "Audio", Distro::Ubuntu),
        issue("mid", "Mid", "Audio", Distro::Ubuntu),
    ];
    records[0].created_at = day(16);
    records[1].created_at = day(20);
    records[2].created_at = day(18);

    rank_records(&mut records, Ranking::Latest);

    let order: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(order, vec!["new", "mid", "old"]);
    assert!(
        records
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    );
}

#[test]
fn accepted_answers_come_first_then_upvotes() {
    let mut answers = vec![
        answer("low", 1, false),
        answer("high", 9, false),
        answer("accepted", 0, true),
        answer("mid", 4, false),
    ];

    rank_answers(&mut answers);

    let order: Vec<_> = answers.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(order, vec!["accepted", "high", "mid", "low"]);
}

#[test]
fn comments_read_oldest_first() {
    let comment = |id: &str, on: u32| Comment {
        id: id.to_string(),
        issue_id: "1".to_string(),
        author: "tux".to_string(),
        text: "thanks".to_string(),
        created_at: day(on),
    };
    let mut comments = vec![comment("second", 12), comment("first", 3)];

    rank_comments(&mut comments);

    assert_eq!(comments[0].id, "first");
}

#[test]
fn truncate_keeps_the_head() {
    assert_eq!(truncate(vec![1, 2, 3, 4, 5, 6], Some(5)), vec![1, 2, 3, 4, 5]);
    assert_eq!(truncate(vec![1, 2], Some(5)), vec![1, 2]);
    assert_eq!(truncate(vec![1, 2], None), vec![1, 2]);
}

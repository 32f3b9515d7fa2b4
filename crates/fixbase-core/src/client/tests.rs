use std::sync::Arc;

use tempfile::tempdir;

use crate::config::AppConfig;
use crate::error::FixbaseError;
use crate::models::{AnswerDraft, CommentDraft, Distro, IssueForm, ListQuery, ProblemDraft, Ranking, UserId};
use crate::storage::{SqliteStore, StorageKind};
use crate::test_support::issue_draft;
use crate::vote::{VoteOutcome, VoteSession, VoteTarget};

use super::KnowledgeBase;

fn kb() -> KnowledgeBase {
    KnowledgeBase::new(Arc::new(SqliteStore::open_in_memory().expect("open store")))
}

fn user(name: &str) -> UserId {
    UserId(name.to_string())
}

fn problem_draft(title: &str) -> ProblemDraft {
    ProblemDraft {
        title: title.to_string(),
        description: format!("{title} details"),
        distro: Distro::Arch,
        category: "System Errors".to_string(),
        tags: vec![" kernel ".to_string(), String::new()],
    }
}

#[test]
fn submitted_issue_is_listed_by_category_with_zero_upvotes() {
    let kb = kb();
    let mut draft = issue_draft("X", "Audio");
    draft.description = "Y".to_string();
    kb.submit_issue(draft).expect("submit");

    let listed = kb
        .list_issues(&ListQuery::default().with_category("Audio"))
        .expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "X");
    assert_eq!(listed[0].upvotes, 0);
    assert_eq!(listed[0].distro, Distro::Ubuntu);
}

#[test]
fn empty_title_fails_validation_and_stores_nothing() {
    let kb = kb();
    let err = kb
        .submit_issue(issue_draft("   ", "Audio"))
        .expect_err("blank title must fail");
    assert!(matches!(err, FixbaseError::Validation(_)));
    assert!(kb.list_issues(&ListQuery::default()).expect("list").is_empty());
}

#[test]
fn steps_to_fix_are_required_for_issues() {
    let kb = kb();
    let mut draft = issue_draft("No sound", "Audio");
    draft.steps_to_fix = String::new();
    let err = kb.submit_issue(draft).expect_err("missing steps");
    assert!(err.to_string().contains("stepsToFix"));
}

#[test]
fn form_text_is_parsed_into_tags_and_commands() {
    let kb = kb();
    let form = IssueForm {
        title: "No sound".to_string(),
        description: "Speakers silent".to_string(),
        distro: Distro::Ubuntu,
        category: "Audio".to_string(),
        tags_text: "audio, pulseaudio, ".to_string(),
        steps_to_fix: "1. Restart the sound server".to_string(),
        commands_text: "aplay -l\n\nalsamixer\n".to_string(),
    };
    let issue = kb.submit_issue(form.into_draft()).expect("submit");
    assert_eq!(issue.tags, vec!["audio", "pulseaudio"]);
    assert_eq!(issue.commands, vec!["aplay -l", "alsamixer"]);
    assert_eq!(kb.get_issue(&issue.id).expect("get"), issue);
}

#[test]
fn listings_default_to_latest_and_top_view_is_capped() {
    let kb = kb();
    assert_eq!(kb.seed_samples().expect("seed"), 6);

    let latest = kb.list_issues(&ListQuery::default()).expect("latest");
    assert_eq!(latest.len(), 6);
    assert!(latest.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let top = kb.top_issues(&ListQuery::default()).expect("top");
    assert_eq!(top.len(), 5);
    assert!(top.windows(2).all(|w| w[0].upvotes >= w[1].upvotes));
    assert_eq!(top[0].upvotes, 31);

    let top_two = kb
        .top_issues(&ListQuery::default().with_limit(2))
        .expect("top two");
    assert_eq!(top_two.len(), 2);
}

#[test]
fn seeding_is_skipped_when_issues_exist() {
    let kb = kb();
    kb.submit_issue(issue_draft("Mine", "Audio")).expect("submit");
    assert_eq!(kb.seed_samples().expect("seed"), 0);
    assert_eq!(kb.list_issues(&ListQuery::default()).expect("list").len(), 1);
}

#[test]
fn search_reaches_tags_and_respects_sentinels() {
    let kb = kb();
    kb.seed_samples().expect("seed");

    let by_tag = kb.list_issues(&ListQuery::search("VSYNC")).expect("search");
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].category, "Display");

    let everything = kb
        .list_issues(&ListQuery::default().with_category("all").with_distro("all"))
        .expect("all");
    assert_eq!(everything.len(), 6);

    let nothing = kb
        .list_issues(&ListQuery::default().with_distro("Slackware"))
        .expect("unknown distro");
    assert!(nothing.is_empty());

    let sorted = kb
        .list_issues(&ListQuery::default().with_distro("ubuntu").with_sort(Ranking::Top))
        .expect("ubuntu");
    assert_eq!(sorted.len(), 2);
    assert!(sorted[0].upvotes >= sorted[1].upvotes);
}

#[test]
fn two_server_side_upvotes_add_two() {
    let kb = kb();
    let issue = kb.submit_issue(issue_draft("No sound", "Audio")).expect("submit");
    kb.upvote_issue(&issue.id).expect("first");
    let after = kb.upvote_issue(&issue.id).expect("second");
    assert_eq!(after.upvotes, 2);

    let problem = kb
        .ask_problem(Some(&user("alice")), problem_draft("Kernel panic"))
        .expect("ask");
    kb.upvote_problem(&problem.id).expect("first");
    let after = kb.upvote_problem(&problem.id).expect("second");
    assert_eq!(after.upvotes, 2);
}

#[test]
fn caller_computed_counts_lose_concurrent_updates() {
    let kb = kb();
    let issue = kb.submit_issue(issue_draft("No sound", "Audio")).expect("submit");
    let snapshot = kb.get_issue(&issue.id).expect("snapshot");

    kb.set_issue_upvotes(&issue.id, snapshot.upvotes + 1).expect("client a");
    let after = kb
        .set_issue_upvotes(&issue.id, snapshot.upvotes + 1)
        .expect("client b");
    assert_eq!(after.upvotes, 1);
}

#[test]
fn negative_adjustments_clamp_at_zero() {
    let kb = kb();
    let issue = kb.submit_issue(issue_draft("No sound", "Audio")).expect("submit");
    let after = kb.adjust_issue_upvotes(&issue.id, -5).expect("adjust");
    assert_eq!(after.upvotes, 0);
}

#[test]
fn upvoting_unknown_records_is_not_found() {
    let kb = kb();
    assert!(matches!(
        kb.upvote_issue("missing"),
        Err(FixbaseError::NotFound(_))
    ));
    assert!(matches!(
        kb.set_issue_upvotes("missing", 3),
        Err(FixbaseError::NotFound(_))
    ));
    assert!(matches!(
        kb.upvote_problem("missing"),
        Err(FixbaseError::NotFound(_))
    ));
}

#[test]
fn session_blocks_second_vote_but_server_does_not() {
    let kb = kb();
    let issue = kb.submit_issue(issue_draft("No sound", "Audio")).expect("submit");
    let mut session = VoteSession::new(kb.clone());

    let first = session.upvote_issue(&issue.id).expect("first");
    assert!(matches!(first, VoteOutcome::Counted(ref i) if i.upvotes == 1));
    assert!(session.has_voted(VoteTarget::Issue, &issue.id));
    assert_eq!(
        session.upvote_issue(&issue.id).expect("second"),
        VoteOutcome::AlreadyVoted
    );
    assert_eq!(kb.get_issue(&issue.id).expect("get").upvotes, 1);

    kb.upvote_issue(&issue.id).expect("direct");
    assert_eq!(kb.get_issue(&issue.id).expect("get").upvotes, 2);

    let mut fresh = VoteSession::new(kb.clone());
    assert!(!fresh.has_voted(VoteTarget::Issue, &issue.id));
    assert!(matches!(
        fresh.upvote_issue(&issue.id).expect("new session"),
        VoteOutcome::Counted(_)
    ));
}

#[test]
fn session_guards_problems_separately() {
    let kb = kb();
    let problem = kb
        .ask_problem(Some(&user("alice")), problem_draft("Kernel panic"))
        .expect("ask");
    let mut session = VoteSession::new(kb.clone());
    session.upvote_problem(&problem.id).expect("first");
    assert_eq!(
        session.upvote_problem(&problem.id).expect("second"),
        VoteOutcome::AlreadyVoted
    );
    assert!(!session.has_voted(VoteTarget::Issue, &problem.id));
    assert_eq!(kb.get_problem(&problem.id).expect("get").upvotes, 1);
}

#[test]
fn blank_comment_fields_are_rejected_before_storage() {
    let kb = kb();
    let issue = kb.submit_issue(issue_draft("No sound", "Audio")).expect("submit");
    for (author, text) in [("  ", "thanks"), ("tux", "\n\t"), ("", "")] {
        let err = kb
            .add_comment(CommentDraft {
                issue_id: issue.id.clone(),
                author: author.to_string(),
                text: text.to_string(),
            })
            .expect_err("blank comment");
        assert!(matches!(err, FixbaseError::Validation(_)));
    }
    assert!(kb.list_comments(&issue.id).expect("list").is_empty());

    let err = kb
        .add_comment(CommentDraft {
            issue_id: "missing".to_string(),
            author: String::new(),
            text: "hi".to_string(),
        })
        .expect_err("validation first");
    assert!(matches!(err, FixbaseError::Validation(_)));
}

#[test]
fn comments_append_oldest_first() {
    let kb = kb();
    let issue = kb.submit_issue(issue_draft("No sound", "Audio")).expect("submit");
    for text in ["first", "second"] {
        kb.add_comment(CommentDraft {
            issue_id: issue.id.clone(),
            author: " tux ".to_string(),
            text: text.to_string(),
        })
        .expect("comment");
    }
    let comments = kb.list_comments(&issue.id).expect("list");
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text, "first");
    assert_eq!(comments[0].author, "tux");

    let err = kb
        .add_comment(CommentDraft {
            issue_id: "missing".to_string(),
            author: "tux".to_string(),
            text: "hi".to_string(),
        })
        .expect_err("unknown issue");
    assert!(matches!(err, FixbaseError::NotFound(_)));
}

#[test]
fn problems_and_answers_require_a_caller() {
    let kb = kb();
    let err = kb
        .ask_problem(None, problem_draft("Kernel panic"))
        .expect_err("anonymous ask");
    assert!(matches!(err, FixbaseError::Unauthorized(_)));
    assert!(kb.list_problems(&ListQuery::default()).expect("list").is_empty());

    let problem = kb
        .ask_problem(Some(&user("alice")), problem_draft("Kernel panic"))
        .expect("ask");
    assert_eq!(problem.user_id, user("alice"));
    assert_eq!(problem.tags, vec!["kernel"]);

    let err = kb
        .add_answer(None, &problem.id, AnswerDraft { content: "reboot".to_string() })
        .expect_err("anonymous answer");
    assert!(matches!(err, FixbaseError::Unauthorized(_)));

    let err = kb
        .add_answer(Some(&user("bob")), &problem.id, AnswerDraft { content: " ".to_string() })
        .expect_err("blank answer");
    assert!(matches!(err, FixbaseError::Validation(_)));

    let answer = kb
        .add_answer(
            Some(&user("bob")),
            &problem.id,
            AnswerDraft { content: "Boot the previous kernel".to_string() },
        )
        .expect("answer");
    assert_eq!(answer.upvotes, 0);
    assert!(!answer.is_accepted);
    assert_eq!(kb.list_answers(&problem.id).expect("answers"), vec![answer]);
}

#[test]
fn problem_listing_filters_without_tags() {
    let kb = kb();
    let alice = user("alice");
    kb.ask_problem(Some(&alice), problem_draft("Kernel panic")).expect("ask");
    let mut other = problem_draft("Fans always at full speed");
    other.distro = Distro::Debian;
    other.category = "Display".to_string();
    kb.ask_problem(Some(&alice), other).expect("ask");

    assert_eq!(
        kb.list_problems(&ListQuery::search("PANIC")).expect("search").len(),
        1
    );
    assert_eq!(
        kb.list_problems(&ListQuery::search("panic details"))
            .expect("description")
            .len(),
        1
    );
    assert_eq!(
        kb.list_problems(&ListQuery::default().with_distro("Debian"))
            .expect("distro")
            .len(),
        1
    );
    assert!(
        kb.list_problems(&ListQuery::search("nothing-like-this"))
            .expect("none")
            .is_empty()
    );
    assert!(matches!(
        kb.get_problem("missing"),
        Err(FixbaseError::NotFound(_))
    ));
}

#[test]
fn open_composes_local_backend_under_root() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path().join("data");
    let config = AppConfig::defaults(&root);
    let kb = KnowledgeBase::open(&config).expect("open");
    assert_eq!(kb.storage_kind(), StorageKind::Local);
    assert!(config.database_path().exists());

    let remote = AppConfig::defaults(&root).with_storage(StorageKind::Remote);
    assert!(matches!(
        KnowledgeBase::open(&remote),
        Err(FixbaseError::Config(_))
    ));
}

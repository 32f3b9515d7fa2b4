use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use fixbase_core::models::{AnswerDraft, CommentDraft, MetaResponse, UserId};
use fixbase_core::storage::StorageKind;
use fixbase_core::{AppConfig, KnowledgeBase};

use crate::cli::{AnswersCommand, Cli, Commands, CommentsCommand, IssuesCommand, ProblemsCommand};

mod web;


#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitReport {
    root: PathBuf,
    storage: StorageKind,
    top_limit: usize,
}

#[derive(Debug, Serialize)]
struct SeedReport {
    seeded: usize,
}

pub(crate) fn run(cli: Cli) -> Result<()> {
    // Metadata is static and must not depend on a reachable store.
    if matches!(cli.command, Commands::Meta) {
        return print_json(&MetaResponse::current());
    }
    let config = resolve_config(&cli)?;
    let kb = KnowledgeBase::open(&config).context("failed to open knowledge base")?;
    debug!(storage = %kb.storage_kind(), root = %config.root.display(), "knowledge base opened");
    if config.seed_on_start && !matches!(cli.command, Commands::Seed) {
        kb.seed_samples().context("failed to seed sample issues")?;
    }

    match cli.command {
        Commands::Init => print_json(&InitReport {
            root: config.root.clone(),
            storage: kb.storage_kind(),
            top_limit: kb.top_limit(),
        }),
        Commands::Seed => {
            let seeded = kb.seed_samples()?;
            print_json(&SeedReport { seeded })
        }
        Commands::Issues(args) => run_issues(&kb, args.command),
        Commands::Comments(args) => run_comments(&kb, args.command),
        Commands::Problems(args) => run_problems(&kb, args.command),
        Commands::Answers(args) => run_answers(&kb, args.command),
        Commands::Meta => print_json(&MetaResponse::current()),
        Commands::Web(args) => web::serve(kb, &args),
    }
}

/// Flags win over environment, which wins over `fixbase.toml`.
pub(crate) fn resolve_config(cli: &Cli) -> Result<AppConfig> {
    let config = AppConfig::load(cli.root.clone())
        .with_context(|| format!("failed to load configuration under {}", cli.root.display()))?;
    Ok(match cli.storage {
        Some(storage) => config.with_storage(storage.into()),
        None => config,
    })
}

fn run_issues(kb: &KnowledgeBase, command: IssuesCommand) -> Result<()> {
    match command {
        IssuesCommand::List(args) => print_json(&kb.list_issues(&args.to_query())?),
        IssuesCommand::Top(args) => print_json(&kb.top_issues(&args.to_query())?),
        IssuesCommand::Show { id } => print_json(&kb.get_issue(&id)?),
        IssuesCommand::Submit(args) => {
            print_json(&kb.submit_issue(args.into_form().into_draft())?)
        }
        IssuesCommand::Upvote { id, set: Some(upvotes) } => {
            print_json(&kb.set_issue_upvotes(&id, upvotes)?)
        }
        IssuesCommand::Upvote { id, set: None } => print_json(&kb.upvote_issue(&id)?),
    }
}

fn run_comments(kb: &KnowledgeBase, command: CommentsCommand) -> Result<()> {
    match command {
        CommentsCommand::List { issue_id } => print_json(&kb.list_comments(&issue_id)?),
        CommentsCommand::Add {
            issue_id,
            author,
            text,
        } => print_json(&kb.add_comment(CommentDraft {
            issue_id,
            author,
            text,
        })?),
    }
}

fn run_problems(kb: &KnowledgeBase, command: ProblemsCommand) -> Result<()> {
    match command {
        ProblemsCommand::List(args) => print_json(&kb.list_problems(&args.to_query())?),
        ProblemsCommand::Show { id } => print_json(&kb.get_problem(&id)?),
        ProblemsCommand::Ask(args) => {
            let caller = caller(args.user.as_deref());
            print_json(&kb.ask_problem(caller.as_ref(), args.to_draft())?)
        }
        ProblemsCommand::Upvote { id } => print_json(&kb.upvote_problem(&id)?),
    }
}

fn run_answers(kb: &KnowledgeBase, command: AnswersCommand) -> Result<()> {
    match command {
        AnswersCommand::List { problem_id } => print_json(&kb.list_answers(&problem_id)?),
        AnswersCommand::Add {
            problem_id,
            user,
            content,
        } => {
            let caller = caller(user.as_deref());
            print_json(&kb.add_answer(caller.as_ref(), &problem_id, AnswerDraft { content })?)
        }
    }
}

fn caller(user: Option<&str>) -> Option<UserId> {
    user.and_then(UserId::parse)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

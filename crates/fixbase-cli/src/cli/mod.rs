use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;
mod comments;
mod issues;
mod problems;


pub use args::{QueryArgs, StorageArg, WebArgs};
pub use comments::{CommentsArgs, CommentsCommand};
pub use issues::{IssuesArgs, IssuesCommand, SubmitIssueArgs};
pub use problems::{AnswersArgs, AnswersCommand, AskProblemArgs, ProblemsArgs, ProblemsCommand};

#[derive(Debug, Parser)]
#[command(name = "fixbase")]
#[command(about = "Community knowledge base of Linux problems and their fixes", version)]
pub struct Cli {
    #[arg(long, default_value = ".fixbase")]
    pub root: PathBuf,

    /// Storage backend. Overrides `fixbase.toml` and `FIXBASE_STORAGE`.
    #[arg(long, value_enum)]
    pub storage: Option<StorageArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the local store under `--root`.
    Init,
    /// Load the sample issues into an empty store.
    Seed,
    Issues(IssuesArgs),
    Comments(CommentsArgs),
    Problems(ProblemsArgs),
    Answers(AnswersArgs),
    /// Print the category and distribution vocabularies.
    Meta,
    /// Serve the JSON API.
    Web(WebArgs),
}

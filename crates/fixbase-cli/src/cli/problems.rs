use clap::{Args, Subcommand};

use fixbase_core::models::{Distro, ProblemDraft};
use fixbase_core::text::parse_tags;

use super::QueryArgs;

#[derive(Debug, Args)]
pub struct ProblemsArgs {
    #[command(subcommand)]
    pub command: ProblemsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProblemsCommand {
    List(QueryArgs),
    Show {
        id: String,
    },
    Ask(AskProblemArgs),
    Upvote {
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct AskProblemArgs {
    /// Authenticated identity of the asker. Required by the service.
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long, default_value = "Ubuntu")]
    pub distro: Distro,
    #[arg(long)]
    pub category: String,
    #[arg(long, default_value = "")]
    pub tags: String,
}

impl AskProblemArgs {
    pub fn to_draft(&self) -> ProblemDraft {
        ProblemDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            distro: self.distro,
            category: self.category.clone(),
            tags: parse_tags(&self.tags),
        }
    }
}

#[derive(Debug, Args)]
pub struct AnswersArgs {
    #[command(subcommand)]
    pub command: AnswersCommand,
}

#[derive(Debug, Subcommand)]
pub enum AnswersCommand {
    /// Answers to a problem, accepted first and then by upvotes.
    List {
        problem_id: String,
    },
    Add {
        problem_id: String,
        #[arg(long)]
        user: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        content: String,
    },
}

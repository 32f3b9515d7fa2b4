use clap::{Args, Subcommand};

use fixbase_core::models::{Distro, IssueForm};

use super::QueryArgs;

#[derive(Debug, Args)]
pub struct IssuesArgs {
    #[command(subcommand)]
    pub command: IssuesCommand,
}

#[derive(Debug, Subcommand)]
pub enum IssuesCommand {
    List(QueryArgs),
    /// Most upvoted issues; `--limit` defaults to the configured top limit.
    Top(QueryArgs),
    Show {
        id: String,
    },
    Submit(SubmitIssueArgs),
    Upvote {
        id: String,
        /// Store this absolute count instead of the displayed count plus one.
        #[arg(long)]
        set: Option<u32>,
    },
}

#[derive(Debug, Args)]
pub struct SubmitIssueArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub description: String,
    #[arg(long, default_value = "Ubuntu")]
    pub distro: Distro,
    #[arg(long)]
    pub category: String,
    /// Comma-separated, e.g. `audio, pulseaudio`.
    #[arg(long, default_value = "")]
    pub tags: String,
    #[arg(long = "steps")]
    pub steps_to_fix: String,
    /// One command per line.
    #[arg(long, default_value = "")]
    pub commands: String,
}

impl SubmitIssueArgs {
    pub fn into_form(self) -> IssueForm {
        IssueForm {
            title: self.title,
            description: self.description,
            distro: self.distro,
            category: self.category,
            tags_text: self.tags,
            steps_to_fix: self.steps_to_fix,
            commands_text: self.commands,
        }
    }
}

use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct CommentsArgs {
    #[command(subcommand)]
    pub command: CommentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CommentsCommand {
    List {
        issue_id: String,
    },
    Add {
        issue_id: String,
        #[arg(long)]
        author: String,
        #[arg(long, allow_hyphen_values = true)]
        text: String,
    },
}

use clap::{Args, ValueEnum};

use fixbase_core::models::{ListQuery, Ranking};
use fixbase_core::storage::StorageKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageArg {
    Local,
    Remote,
}

impl From<StorageArg> for StorageKind {
    fn from(value: StorageArg) -> Self {
        match value {
            StorageArg::Local => Self::Local,
            StorageArg::Remote => Self::Remote,
        }
    }
}

/// Listing filters shared by issue and problem listings. `all` or an empty value
/// leaves a filter unset.
#[derive(Debug, Clone, Default, Args)]
pub struct QueryArgs {
    /// Case-insensitive text matched against title, description and (for issues) tags.
    #[arg(long, allow_hyphen_values = true)]
    pub search: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub distro: Option<String>,
    /// `latest` or `top`.
    #[arg(long)]
    pub sort: Option<Ranking>,
    #[arg(long)]
    pub limit: Option<usize>,
}

impl QueryArgs {
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            search: self.search.clone(),
            category: self.category.clone(),
            distro: self.distro.clone(),
            sort: self.sort,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Args)]
pub struct WebArgs {
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
    #[arg(long, default_value_t = 8787)]
    pub port: u16,
}

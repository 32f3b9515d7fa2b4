use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::Distro;
use crate::error::FixbaseError;

/// Fixed ordering applied to a listing. Views pick exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Ranking {
    /// Newest first by creation time.
    #[default]
    Latest,
    /// Most upvoted first.
    Top,
}

impl Ranking {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Top => "top",
        }
    }
}

impl fmt::Display for Ranking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ranking {
    type Err = FixbaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" | "newest" => Ok(Self::Latest),
            "top" | "upvotes" => Ok(Self::Top),
            other => Err(FixbaseError::Validation(format!(
                "unknown sort '{other}', expected latest or top"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Ranking {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Listing request shared by issues and problems. Every field is optional; empty
/// strings and the `all` sentinel impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub distro: Option<String>,
    pub sort: Option<Ranking>,
    pub limit: Option<usize>,
}

impl ListQuery {
    #[must_use]
    pub fn search(text: impl Into<String>) -> Self {
        Self {
            search: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_distro(mut self, distro: impl Into<String>) -> Self {
        self.distro = Some(distro.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Ranking) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Predicates a storage backend may evaluate itself before the in-process filter runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageScope {
    pub category: Option<String>,
    pub distro: Option<Distro>,
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::FixbaseError;

/// Categories offered by the submission forms. Stored categories are free text,
/// so records outside this set are still accepted and listed.
pub const CATEGORIES: [&str; 6] = [
    "Networking",
    "Boot Issues",
    "Audio",
    "Display",
    "Package Management",
    "System Errors",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Distro {
    #[default]
    Ubuntu,
    Arch,
    Fedora,
    Debian,
    Other,
}

impl Distro {
    pub const ALL: [Self; 5] = [
        Self::Ubuntu,
        Self::Arch,
        Self::Fedora,
        Self::Debian,
        Self::Other,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ubuntu => "Ubuntu",
            Self::Arch => "Arch",
            Self::Fedora => "Fedora",
            Self::Debian => "Debian",
            Self::Other => "Other",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|distro| distro.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Distro {
    type Err = FixbaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            FixbaseError::Validation(format!(
                "unknown distro '{s}', expected one of Ubuntu, Arch, Fedora, Debian, Other"
            ))
        })
    }
}

impl<'de> Deserialize<'de> for Distro {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

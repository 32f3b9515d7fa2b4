use crate::models::{Distro, Issue, ListQuery, Problem, StorageScope};


const ALL_SENTINEL: &str = "all";

/// Fields a listing record exposes to the query filter.
pub trait Searchable {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    /// Tags consulted by free-text search. Problems do not search their tags.
    fn searchable_tags(&self) -> &[String];
    fn category(&self) -> &str;
    fn distro(&self) -> Distro;
}

impl Searchable for Issue {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn searchable_tags(&self) -> &[String] {
        &self.tags
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn distro(&self) -> Distro {
        self.distro
    }
}

impl Searchable for Problem {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn searchable_tags(&self) -> &[String] {
        &[]
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn distro(&self) -> Distro {
        self.distro
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DistroConstraint {
    Only(Distro),
    /// The requested distro is not one we know, so nothing can match it.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NormalizedQuery {
    pub(crate) search: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) distro: Option<DistroConstraint>,
}

impl NormalizedQuery {
    pub(crate) fn matches_nothing(&self) -> bool {
        self.distro == Some(DistroConstraint::Unknown)
    }

    pub(crate) fn storage_scope(&self) -> StorageScope {
        StorageScope {
            category: self.category.clone(),
            distro: match self.distro {
                Some(DistroConstraint::Only(distro)) => Some(distro),
                _ => None,
            },
        }
    }
}

/// Returns `None` when the query imposes no constraint at all.
pub(crate) fn normalize_query(query: &ListQuery) -> Option<NormalizedQuery> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_lowercase);
    let category = constraint_value(query.category.as_deref()).map(ToString::to_string);
    let distro = constraint_value(query.distro.as_deref()).map(|raw| {
        Distro::parse(raw).map_or(DistroConstraint::Unknown, DistroConstraint::Only)
    });

    if search.is_none() && category.is_none() && distro.is_none() {
        return None;
    }
    Some(NormalizedQuery {
        search,
        category,
        distro,
    })
}

fn constraint_value(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL_SENTINEL))
}

pub(crate) fn record_matches<T: Searchable + ?Sized>(record: &T, query: &NormalizedQuery) -> bool {
    if query
        .category
        .as_deref()
        .is_some_and(|category| record.category() != category)
    {
        return false;
    }

    match query.distro {
        Some(DistroConstraint::Only(distro)) if record.distro() != distro => return false,
        Some(DistroConstraint::Unknown) => return false,
        _ => {}
    }

    let Some(needle) = &query.search else {
        return true;
    };
    contains_folded(record.title(), needle)
        || contains_folded(record.description(), needle)
        || record
            .searchable_tags()
            .iter()
            .any(|tag| contains_folded(tag, needle))
}

fn contains_folded(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Keeps the records satisfying every supplied condition of `query`, in their original order.
pub fn filter_records<T: Searchable>(records: Vec<T>, query: &ListQuery) -> Vec<T> {
    let Some(normalized) = normalize_query(query) else {
        return records;
    };
    records
        .into_iter()
        .filter(|record| record_matches(record, &normalized))
        .collect()
}

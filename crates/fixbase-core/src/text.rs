/// Splits comma-separated tag text into trimmed, non-empty tags.
#[must_use]
pub fn parse_tags(text: &str) -> Vec<String> {
    normalize_entries(text.split(','))
}

/// Splits newline-separated command text into trimmed, non-empty commands.
#[must_use]
pub fn parse_commands(text: &str) -> Vec<String> {
    normalize_entries(text.lines())
}

pub fn normalize_entries<I, S>(entries: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    entries
        .into_iter()
        .map(|entry| entry.as_ref().trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

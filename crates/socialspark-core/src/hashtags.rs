//! Hashtag helpers shared by generation and sharing.

/// Trims each tag, strips leading `#` marks and drops blanks. Everything else
/// (case, hyphens, repeats) is kept as the server returned it.
#[must_use]
pub fn strip_hash_marks<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| tag.as_ref().trim().trim_start_matches('#').trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Renders tags as `#one #two`.
#[must_use]
pub fn format_hashtags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<_>>()
        .join(" ")
}

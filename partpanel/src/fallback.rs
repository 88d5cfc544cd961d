//! Ordered fallback over optional display values.
//!
//! Several payload fields are resolved as "use X if present, else Y, else a
//! literal". An empty string counts as absent.

/// Returns the first candidate that is present and non-empty.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .find(|value| !value.is_empty())
}

/// Treats an empty string as absent.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

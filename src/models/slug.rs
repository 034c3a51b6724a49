//! URL-safe slug derivation and validation.
//!
//! Slugs identify projects and articles in public URLs and must be unique
//! per entity table. Uniqueness is enforced by the repository; this module
//! only handles the string form.

/// Derive a slug from a free-text title: lowercase ASCII alphanumerics,
/// everything else collapsed into single hyphens.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_hyphen = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}

/// Check that a caller-supplied slug is URL-safe: non-empty, lowercase
/// alphanumerics and hyphens, no leading/trailing/double hyphen.
pub fn is_valid(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

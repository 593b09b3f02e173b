//! Slug and permalink helpers.

/// Convert a title into a URL slug.
///
/// Keeps ASCII letters, digits, `_` and `-`; lowercases; collapses runs of
/// whitespace and hyphens into a single `-`; trims leading/trailing hyphens.
/// Non-ASCII characters are dropped.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c == '-' || c.is_whitespace() {
            pending_dash = true;
        }
    }

    slug
}

/// Whether `s` matches `[a-z0-9-_]+`, the category slug pattern.
#[must_use]
pub fn is_valid_slug(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Path of a question thread: `/articles/{id}/{slug}/`, or `/articles/{id}/`
/// when slug URLs are disabled or the title slugifies to nothing.
#[must_use]
pub fn thread_path(question_id: i64, title: &str, slug_urls: bool) -> String {
    let slug = if slug_urls { slugify(title) } else { String::new() };
    if slug.is_empty() {
        format!("/articles/{question_id}/")
    } else {
        format!("/articles/{question_id}/{slug}/")
    }
}

/// Path of a category listing.
#[must_use]
pub fn category_path(slug: &str) -> String {
    format!("/articles/{slug}/")
}

/// Path of a moderation action.
#[must_use]
pub fn moderate_path(model: &str, lookup_id: i64, action: &str) -> String {
    format!("/moderate/{model}/{lookup_id}/{action}/")
}

//! URL slugs derived from titles.

/// Turn a title into a URL-safe slug.
///
/// Lowercases and trims, turns whitespace runs into `-`, drops everything
/// outside `[A-Za-z0-9_-]` and collapses repeated `-`. The result is not
/// guaranteed unique; callers check for collisions.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());
    let mut in_whitespace = false;

    for c in lowered.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
        }
    }

    collapse_hyphens(&slug)
}

/// Hyphen runs can also form around dropped characters, so collapse last
fn collapse_hyphens(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out
}

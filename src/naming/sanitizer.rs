// Filename sanitization shared by every handler category.

/// Replaces every run of characters outside `[A-Za-z0-9._]` with a single `_`.
///
/// The mapping is total: any input, including control characters, path
/// separators and non-ASCII text, yields a string that matches
/// `^[A-Za-z0-9._]*$`. An empty input stays empty so callers can fall back
/// to an id-based name.
pub fn sanitize_name(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut in_unsafe_run = false;

    for ch in name.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '_' => {
                sanitized.push(ch);
                in_unsafe_run = false;
            }
            // Collapse the rest of the run
            _ if in_unsafe_run => {}
            _ => {
                sanitized.push('_');
                in_unsafe_run = true;
            }
        }
    }

    sanitized
}

/// True for names usable as a single path component: non-empty, not made
/// only of dots, and within the sanitizer's alphabet.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().all(|c| c == '.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

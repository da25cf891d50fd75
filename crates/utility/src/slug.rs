/// Turns a display name into a URL-safe slug.
///
/// Lowercases the text, collapses every whitespace run into a single `-` and
/// then drops everything that is neither a word character (`[A-Za-z0-9_]`)
/// nor `-`. Applying it twice yields the same result as applying it once.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut hyphenated = String::with_capacity(lower.len());
    let mut in_whitespace = false;
    for ch in lower.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                hyphenated.push('-');
            }
            in_whitespace = true;
        } else {
            hyphenated.push(ch);
            in_whitespace = false;
        }
    }
    hyphenated
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .collect()
}

/// Replaces every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|ch| match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '_' | '-' => ch,
            _ => '_',
        })
        .collect()
}

//! ILIKE helpers

/// Escape `%`, `_` and `\` for use inside an ILIKE pattern.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Case-insensitive "contains" pattern for `term`.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("Nairobi"), "Nairobi");
    }

    #[test]
    fn test_contains_pattern() {
        assert_eq!(contains_pattern("Msasani"), "%Msasani%");
    }
}

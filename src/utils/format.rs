use std::cmp::Ordering;

/// Case-insensitive string comparison without allocating lowercase copies
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(|c| c.to_lowercase())
        .cmp(b.chars().flat_map(|c| c.to_lowercase()))
}

/// Case-insensitive substring check.
/// The needle is expected to already be lowercased.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_ignore_case() {
        assert_eq!(cmp_ignore_case("apple", "APPLE"), Ordering::Equal);
        assert_eq!(cmp_ignore_case("apple", "Banana"), Ordering::Less);
        assert_eq!(cmp_ignore_case("Cherry", "banana"), Ordering::Greater);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Blue Jeans", "jean"));
        assert!(contains_ignore_case("BLUE", "blue"));
        assert!(!contains_ignore_case("Blue Jeans", "shirt"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
    }
}

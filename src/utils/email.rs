/// Normalizes an address for storage and lookups.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

/// Structural check only: one `@`, a non-empty local part, and a dotted
/// domain without empty labels.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return false;
    }
    domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "",
            "ada",
            "@example.com",
            "ada@",
            "ada@example",
            "ada@example..com",
            "ada@@example.com",
            "ada @example.com",
            "ada@example.com.",
        ] {
            assert!(!is_valid_email(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }
}

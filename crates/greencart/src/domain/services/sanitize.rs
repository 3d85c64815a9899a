//! Input sanitization for user-supplied text

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::errors::DomainError;

fn script_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script\b.*?</script\s*>").expect("valid regex"))
}

fn html_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("valid regex"))
}

fn email_shape() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

/// Strip script blocks and HTML tags, trim. Never lengthens the input.
pub fn strip_tags(input: &str) -> String {
    let without_scripts = script_block().replace_all(input, "");
    html_tag().replace_all(&without_scripts, "").trim().to_string()
}

/// Strip script blocks and HTML tags, entity-encode what is left, trim.
pub fn sanitize_string(input: &str) -> String {
    let without_tags = strip_tags(input);

    let mut encoded = String::with_capacity(without_tags.len());
    for ch in without_tags.chars() {
        match ch {
            '&' => encoded.push_str("&amp;"),
            '<' => encoded.push_str("&lt;"),
            '>' => encoded.push_str("&gt;"),
            '"' => encoded.push_str("&quot;"),
            '\'' => encoded.push_str("&#x27;"),
            '/' => encoded.push_str("&#x2F;"),
            _ => encoded.push(ch),
        }
    }

    encoded.trim().to_string()
}

/// Lowercase and validate an email address
pub fn sanitize_email(email: &str) -> Result<String, DomainError> {
    let normalized = email.trim().to_lowercase();
    if !email_shape().is_match(&normalized) {
        return Err(DomainError::Validation("Invalid email format".to_string()));
    }
    Ok(normalized)
}

/// Keep `[A-Za-z0-9_]` only; the result must be 3 to 30 characters
pub fn sanitize_username(username: &str) -> Result<String, DomainError> {
    let cleaned: String = username
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if !(3..=30).contains(&cleaned.len()) {
        return Err(DomainError::Validation(
            "Username must be between 3 and 30 characters".to_string(),
        ));
    }
    Ok(cleaned)
}

/// Accept absolute http(s) URLs only
pub fn sanitize_url(url: &str) -> Result<String, DomainError> {
    let trimmed = url.trim();
    let valid = (trimmed.starts_with("https://") || trimmed.starts_with("http://"))
        && !trimmed.chars().any(|c| c.is_whitespace() || c == '<' || c == '>' || c == '"');
    if !valid {
        return Err(DomainError::Validation("Invalid image URL".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Phone numbers need at least 10 digits, formatting characters are ignored
pub fn validate_phone_number(phone: &str) -> Result<String, DomainError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if digits < 10 {
        return Err(DomainError::Validation(
            "Phone number must be at least 10 digits".to_string(),
        ));
    }
    Ok(phone.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_string_strips_scripts_and_tags() {
        let input = "  <script>alert('x')</script><b>Bold</b> & \"quoted\"  ";
        assert_eq!(sanitize_string(input), "Bold &amp; &quot;quoted&quot;");
    }

    #[test]
    fn test_strip_tags_keeps_plain_text() {
        let input = " it's <i>great</i>/cheap & <script>x()</script>done ";
        assert_eq!(strip_tags(input), "it's great/cheap & done");
    }

    #[test]
    fn test_sanitize_string_encodes_leftover_brackets() {
        assert_eq!(sanitize_string("1 < 2"), "1 &lt; 2");
        assert_eq!(sanitize_string("a/b"), "a&#x2F;b");
    }

    #[test]
    fn test_sanitize_email() {
        assert_eq!(
            sanitize_email("  Buyer1@GreenCart.com ").unwrap(),
            "buyer1@greencart.com"
        );
        assert!(sanitize_email("not-an-email").is_err());
        assert!(sanitize_email("a b@c.com").is_err());
    }

    #[test]
    fn test_sanitize_username() {
        assert_eq!(sanitize_username(" seller-1! ").unwrap(), "seller1");
        assert!(sanitize_username("a!").is_err());
        assert!(sanitize_username(&"x".repeat(31)).is_err());
    }

    #[test]
    fn test_sanitize_url() {
        assert!(sanitize_url("https://res.cloudinary.com/demo/image.jpg").is_ok());
        assert!(sanitize_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn test_phone_number_digits() {
        assert!(validate_phone_number("(555) 123-4567").is_ok());
        assert!(validate_phone_number("555-1234").is_err());
    }
}

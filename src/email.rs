//! Email address validation for snapshot notifications.

use regex::Regex;
use std::sync::OnceLock;

const EMAIL_PATTERN: &str = r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$";

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"))
}

/// Check an address against the conservative `local@domain.tld` shape.
///
/// Matching is case-sensitive: `User@Example.com` is rejected. Callers that
/// want to accept mixed case must lowercase before validating.
pub fn is_valid_email(candidate: &str) -> bool {
    email_regex().is_match(candidate)
}

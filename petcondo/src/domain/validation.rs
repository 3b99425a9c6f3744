//! Shared field validators for form input.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One '@' with non-empty, whitespace-free local and domain parts.
        let pattern = r"^[^\s@]+@[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Minimum digits accepted for a phone number (area code plus landline).
pub const PHONE_MIN_DIGITS: usize = 10;
/// Maximum digits accepted for a phone number (area code plus mobile).
pub const PHONE_MAX_DIGITS: usize = 11;

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Marker error for a malformed email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEmail;

/// Trimmed email address with a single `@`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an email address.
    pub fn parse(raw: &str) -> Result<Self, InvalidEmail> {
        let trimmed = raw.trim();
        if email_regex().is_match(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(InvalidEmail)
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Strip a masked phone number such as `(11) 99999-0000` down to digits and
/// check its length.
pub(crate) fn normalise_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS)
        .contains(&digits.len())
        .then_some(digits)
}

//! Email-vs-user_id disambiguation for user lookups.
//!
//! A user is addressed either by email or by the application's own
//! `user_id`. The choice is purely syntactic: anything that looks like an
//! email address is sent as `email=`, everything else as `user_id=`.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

// Shortest address accepted: a@b.co
const MIN_EMAIL_LEN: usize = 6;

/// Syntactic email check. Does not verify that the mailbox exists.
pub fn is_email(candidate: &str) -> bool {
    candidate.len() >= MIN_EMAIL_LEN && EMAIL.is_match(candidate)
}

/// A user reference as sent in a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentifier {
    Email(String),
    UserId(String),
}

impl UserIdentifier {
    pub fn classify(identifier: &str) -> Self {
        if is_email(identifier) {
            UserIdentifier::Email(identifier.to_string())
        } else {
            UserIdentifier::UserId(identifier.to_string())
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            UserIdentifier::Email(_) => "email",
            UserIdentifier::UserId(_) => "user_id",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            UserIdentifier::Email(v) | UserIdentifier::UserId(v) => v,
        }
    }

    /// `email=<encoded>` or `user_id=<encoded>`.
    pub fn query(&self) -> String {
        format!("{}={}", self.key(), urlencoding::encode(self.value()))
    }
}

impl From<&str> for UserIdentifier {
    fn from(identifier: &str) -> Self {
        Self::classify(identifier)
    }
}

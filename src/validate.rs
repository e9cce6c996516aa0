use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ApiError, Violation};

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Collects every violated rule of a request before failing, so the client
/// sees the full list rather than just the first problem.
#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(Violation {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn require_email(&mut self, field: &str, value: &str) {
        if !is_valid_email(value) {
            self.add(field, "must be a valid email address");
        }
    }

    pub fn require_non_empty(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "must not be empty");
        }
    }

    pub fn require_min_len(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.add(field, format!("must be at least {min} characters"));
        }
    }

    pub fn require_len_between(&mut self, field: &str, value: &str, min: usize, max: usize) {
        let len = value.chars().count();
        if len < min || len > max {
            self.add(field, format!("length must be between {min} and {max}"));
        }
    }

    pub fn finish(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.0))
        }
    }
}

/// Per-route rule set. Runs after the auth gate on protected routes (the gate
/// is a request-parts extractor, so it always precedes body deserialization)
/// and normalizes fields in place.
pub trait ValidateRequest {
    fn validate(&mut self) -> Result<(), ApiError>;
}

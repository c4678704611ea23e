use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

/// Raw form body as posted by the contact page
#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    pub category: Option<String>,
}

/// A submission that passed every check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub category: String,
}

/// First failing check; `Display` is the message shown to the visitor
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name is required.")]
    MissingName,
    #[error("Email is required.")]
    MissingEmail,
    #[error("Invalid email format.")]
    InvalidEmailFormat,
    #[error("Category is required.")]
    MissingCategory,
    #[error("Message is required.")]
    MissingMessage,
}

impl ValidationError {
    /// Stable code for logs
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingName => "missing_name",
            Self::MissingEmail => "missing_email",
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::MissingCategory => "missing_category",
            Self::MissingMessage => "missing_message",
        }
    }
}

const CATEGORY_LABELS: [(&str, &str); 4] = [
    ("seat-reservation", "Seat Reservation for Dining"),
    ("party-hall", "Party Hall Reservation"),
    ("general-info", "General Information"),
    ("feedback", "Feedback"),
];

/// Display label for a category code; unknown codes are shown as-is
pub fn category_label(code: &str) -> &str {
    CATEGORY_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, label)| *label)
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // local-part, '@', domain with at least one dot; intentionally loose
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn present(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|v| !v.is_empty())
}

/// The raw value, unless it is absent or blank
fn required(field: Option<&str>, missing: ValidationError) -> Result<&str, ValidationError> {
    field.filter(|v| !v.trim().is_empty()).ok_or(missing)
}

impl ContactForm {
    /// Run the checks in order, stopping at the first failure
    pub fn validate(&self) -> Result<ContactSubmission, ValidationError> {
        // Blank checks trim; the accepted values are kept exactly as typed
        let name = required(self.name.as_deref(), ValidationError::MissingName)?;

        let email = required(self.email.as_deref(), ValidationError::MissingEmail)?;
        if !email_pattern().is_match(email) {
            return Err(ValidationError::InvalidEmailFormat);
        }

        let category = required(self.category.as_deref(), ValidationError::MissingCategory)?;
        let message = required(self.message.as_deref(), ValidationError::MissingMessage)?;

        Ok(ContactSubmission {
            name: name.to_string(),
            email: email.to_string(),
            phone: present(self.phone.as_deref()).map(String::from),
            message: message.to_string(),
            category: category.to_string(),
        })
    }
}

impl ContactSubmission {
    pub fn category_label(&self) -> &str {
        category_label(&self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: None,
            message: Some("Table for four on Friday?".to_string()),
            category: Some("seat-reservation".to_string()),
        }
    }

    #[test]
    fn test_valid_submission() {
        let submission = form().validate().unwrap();
        assert_eq!(submission.name, "Ada");
        assert_eq!(submission.category_label(), "Seat Reservation for Dining");
        assert!(submission.phone.is_none());
    }

    #[test]
    fn test_each_missing_field() {
        let cases: [(fn(&mut ContactForm), ValidationError); 4] = [
            (|f| f.name = None, ValidationError::MissingName),
            (|f| f.email = Some("   ".to_string()), ValidationError::MissingEmail),
            (|f| f.category = None, ValidationError::MissingCategory),
            (|f| f.message = Some("\n\t".to_string()), ValidationError::MissingMessage),
        ];
        for (mutate, expected) in cases {
            let mut f = form();
            mutate(&mut f);
            assert_eq!(f.validate(), Err(expected));
        }
    }

    #[test]
    fn test_first_failure_wins() {
        let empty = ContactForm::default();
        assert_eq!(empty.validate(), Err(ValidationError::MissingName));

        let mut f = form();
        f.email = Some("not-an-email".to_string());
        f.message = None;
        assert_eq!(f.validate(), Err(ValidationError::InvalidEmailFormat));
    }

    #[test]
    fn test_email_format() {
        for bad in ["ada", "ada@", "@example.com", "ada@example", "ada @example.com", "a@b@c.d"] {
            let mut f = form();
            f.email = Some(bad.to_string());
            assert_eq!(f.validate(), Err(ValidationError::InvalidEmailFormat), "{bad}");
        }
        for good in ["a@b.co", "first.last+tag@mail.example.org"] {
            let mut f = form();
            f.email = Some(good.to_string());
            assert!(f.validate().is_ok(), "{good}");
        }
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(category_label("feedback"), "Feedback");
        assert_eq!(category_label("party-hall"), "Party Hall Reservation");
        assert_eq!(category_label("general-info"), "General Information");
        assert_eq!(category_label("xyz"), "xyz");
    }

    #[test]
    fn test_accepted_values_keep_surrounding_whitespace() {
        let mut f = form();
        f.name = Some("  Ada Lovelace ".to_string());
        f.message = Some("Table for four?\n".to_string());
        let submission = f.validate().unwrap();
        assert_eq!(submission.name, "  Ada Lovelace ");
        assert_eq!(submission.message, "Table for four?\n");
    }

    #[test]
    fn test_blank_phone_is_absent() {
        let mut f = form();
        f.phone = Some("  ".to_string());
        assert!(f.validate().unwrap().phone.is_none());
        f.phone = Some(" 555-0100 ".to_string());
        assert_eq!(f.validate().unwrap().phone.as_deref(), Some("555-0100"));
    }
}

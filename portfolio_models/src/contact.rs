//! Contact form submissions and the field rules shared by the interactive
//! form and the server.

use std::collections::BTreeMap;

use nutype::nutype;
use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::email_address::EmailAddress;

/// A contact form submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactSubmission {
    pub name: ContactName,
    pub email: EmailAddress,
    pub subject: ContactSubject,
    pub message: ContactMessageContent,
}

#[nutype(
    validate(len_char_min = 2),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize)
)]
pub struct ContactName(String);

#[nutype(derive(Debug, Clone, PartialEq, Eq, From, Deref, Serialize))]
pub struct ContactSubject(String);

#[nutype(
    validate(len_char_min = 10),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref, Serialize)
)]
pub struct ContactMessageContent(String);

impl ContactName {
    fn parse(value: String) -> Result<Self, FieldIssue> {
        Self::try_new(value).map_err(|_| FieldIssue::NameTooShort)
    }
}

impl ContactMessageContent {
    fn parse(value: String) -> Result<Self, FieldIssue> {
        Self::try_new(value).map_err(|_| FieldIssue::MessageTooShort)
    }
}

fn parse_email(value: &str) -> Result<EmailAddress, FieldIssue> {
    value.parse().map_err(|_| FieldIssue::InvalidEmail)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
}

impl ContactField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }

    /// Checks a single value against the rule of this field only.
    pub fn validate(self, value: &str) -> Result<(), FieldIssue> {
        match self {
            Self::Name => ContactName::parse(value.into()).map(drop),
            Self::Email => parse_email(value).map(drop),
            Self::Subject => Ok(()),
            Self::Message => ContactMessageContent::parse(value.into()).map(drop),
        }
    }
}

/// The first rule a field value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldIssue {
    #[error("Required")]
    Required,
    #[error("Expected string")]
    ExpectedString,
    #[error("Name is too short")]
    NameTooShort,
    #[error("Invalid email")]
    InvalidEmail,
    #[error("Message is too short")]
    MessageTooShort,
}

/// A field value as found in an untrusted payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RawField {
    #[default]
    Missing,
    NotAString,
    Text(String),
}

impl RawField {
    fn into_text(self, field: ContactField) -> Result<String, FieldIssue> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Missing if field == ContactField::Subject => Ok(String::new()),
            Self::Missing => Err(FieldIssue::Required),
            Self::NotAString => Err(FieldIssue::ExpectedString),
        }
    }

    fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::String(text)) => Self::Text(text.clone()),
            Some(_) => Self::NotAString,
        }
    }
}

impl From<String> for RawField {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for RawField {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

/// An unvalidated contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmissionInput {
    pub name: RawField,
    pub email: RawField,
    pub subject: RawField,
    pub message: RawField,
}

impl ContactSubmissionInput {
    /// Extracts the submission fields from a JSON value. Anything that is not
    /// an object is treated like an empty object.
    pub fn from_json(value: &Value) -> Self {
        let field = |field: ContactField| RawField::from_json(value.get(field.as_str()));
        Self {
            name: field(ContactField::Name),
            email: field(ContactField::Email),
            subject: field(ContactField::Subject),
            message: field(ContactField::Message),
        }
    }

    /// Validates all fields at once and reports the first issue of every
    /// invalid field.
    pub fn validate(self) -> Result<ContactSubmission, ValidationIssues> {
        let mut issues = ValidationIssues::default();

        let name = issues.check(ContactField::Name, self.name, ContactName::parse);
        let email = issues.check(ContactField::Email, self.email, |x| parse_email(&x));
        let subject = issues.check(ContactField::Subject, self.subject, |x| {
            Ok(ContactSubject::new(x))
        });
        let message = issues.check(
            ContactField::Message,
            self.message,
            ContactMessageContent::parse,
        );

        match (name, email, subject, message) {
            (Some(name), Some(email), Some(subject), Some(message)) => Ok(ContactSubmission {
                name,
                email,
                subject,
                message,
            }),
            _ => Err(issues),
        }
    }
}

/// Field name to human readable error message, one per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationIssues(BTreeMap<ContactField, FieldIssue>);

impl ValidationIssues {
    pub fn get(&self, field: ContactField) -> Option<FieldIssue> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: ContactField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn fields(&self) -> impl Iterator<Item = ContactField> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn set(&mut self, field: ContactField, result: Result<(), FieldIssue>) {
        match result {
            Ok(()) => self.0.remove(&field),
            Err(issue) => self.0.insert(field, issue),
        };
    }

    fn check<T>(
        &mut self,
        field: ContactField,
        raw: RawField,
        parse: impl FnOnce(String) -> Result<T, FieldIssue>,
    ) -> Option<T> {
        raw.into_text(field)
            .and_then(parse)
            .map_err(|issue| self.0.insert(field, issue))
            .ok()
    }
}

impl FromIterator<(ContactField, FieldIssue)> for ValidationIssues {
    fn from_iter<I: IntoIterator<Item = (ContactField, FieldIssue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Serialized as `{"<field>": ["<message>"]}`.
impl Serialize for ValidationIssues {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, issue) in &self.0 {
            map.serialize_entry(field.as_str(), &[issue.to_string()])?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use portfolio_utils::assert_matches;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn input(name: &str, email: &str, subject: &str, message: &str) -> ContactSubmissionInput {
        ContactSubmissionInput {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    #[test]
    fn valid_submission_is_kept_verbatim() {
        // Act
        let result = input(
            " Max Mustermann ",
            "max.mustermann@example.de",
            "",
            "Hello World, how are you?",
        )
        .validate();

        // Assert
        let submission = result.unwrap();
        assert_eq!(*submission.name, " Max Mustermann ");
        assert_eq!(submission.email.as_str(), "max.mustermann@example.de");
        assert_eq!(*submission.subject, "");
        assert_eq!(*submission.message, "Hello World, how are you?");
    }

    #[test]
    fn invalid_fields_are_named_exactly() {
        for (candidate, expected) in [
            (
                input("M", "max@example.de", "", "Hello World!"),
                vec![ContactField::Name],
            ),
            (
                input("Max", "max.example.de", "", "Hello World!"),
                vec![ContactField::Email],
            ),
            (
                input("Max", "max@example.de", "Hi", "Hello"),
                vec![ContactField::Message],
            ),
            (
                input("", "max@", "", ""),
                vec![ContactField::Name, ContactField::Email, ContactField::Message],
            ),
        ] {
            let issues = candidate.validate().unwrap_err();
            assert_eq!(issues.fields().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn length_counts_characters() {
        let result = input("Jö", "max@example.de", "", "ÄÖÜäöüßÄÖÜ").validate();
        assert!(result.is_ok());
    }

    #[test]
    fn short_message() {
        // Arrange
        let input = ContactSubmissionInput::from_json(&json!({
            "name": "Al",
            "email": "a@b.com",
            "message": "short",
        }));

        // Act
        let issues = input.validate().unwrap_err();

        // Assert
        assert_eq!(issues.get(ContactField::Message), Some(FieldIssue::MessageTooShort));
        assert!(!issues.contains(ContactField::Name));
        assert!(!issues.contains(ContactField::Email));
    }

    #[test]
    fn missing_subject_defaults_to_empty() {
        let input = ContactSubmissionInput::from_json(&json!({
            "name": "Max",
            "email": "max@example.de",
            "message": "Hello World!",
        }));
        let submission = input.validate().unwrap();
        assert_eq!(*submission.subject, "");
    }

    #[test]
    fn non_object_is_empty_object() {
        let issues = ContactSubmissionInput::from_json(&json!([1, 2, 3]))
            .validate()
            .unwrap_err();
        assert_eq!(
            issues,
            [
                (ContactField::Name, FieldIssue::Required),
                (ContactField::Email, FieldIssue::Required),
                (ContactField::Message, FieldIssue::Required),
            ]
            .into_iter()
            .collect::<ValidationIssues>()
        );
    }

    #[test]
    fn wrong_types() {
        let issues = ContactSubmissionInput::from_json(&json!({
            "name": 42,
            "email": "max@example.de",
            "subject": false,
            "message": "Hello World!",
        }))
        .validate()
        .unwrap_err();
        assert_eq!(issues.get(ContactField::Name), Some(FieldIssue::ExpectedString));
        assert_eq!(issues.get(ContactField::Subject), Some(FieldIssue::ExpectedString));
    }

    #[test]
    fn field_level_validation() {
        assert_matches!(ContactField::Name.validate("M"), Err(FieldIssue::NameTooShort));
        assert_matches!(ContactField::Name.validate("Max"), Ok(()));
        assert_matches!(ContactField::Email.validate("nope"), Err(FieldIssue::InvalidEmail));
        assert_matches!(ContactField::Subject.validate(""), Ok(()));
        assert_matches!(
            ContactField::Message.validate("too short"),
            Err(FieldIssue::MessageTooShort)
        );
    }

    #[test]
    fn field_level_validation_is_idempotent() {
        for field in ContactField::ALL {
            for value in ["", "x", "max@example.de", "Hello World!"] {
                assert_eq!(field.validate(value), field.validate(value));
            }
        }
    }

    #[test]
    fn serialize_issues() {
        let issues = input("M", "max@example.de", "", "Hi").validate().unwrap_err();
        assert_eq!(
            serde_json::to_value(issues).unwrap(),
            json!({
                "name": ["Name is too short"],
                "message": ["Message is too short"],
            })
        );
    }
}

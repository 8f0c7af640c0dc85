//! State of the interactive contact form.

use crate::contact::{
    ContactField, ContactSubmission, ContactSubmissionInput, FieldIssue, RawField,
    ValidationIssues,
};

/// The raw values of the contact form as typed by the visitor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormValues {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Hidden honeypot input, only ever filled in by bots.
    pub website: String,
}

impl ContactFormValues {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message,
        }
    }

    fn trimmed(&self) -> ContactSubmissionInput {
        let trim = |field: ContactField| -> RawField { self.get(field).trim().into() };
        ContactSubmissionInput {
            name: trim(ContactField::Name),
            email: trim(ContactField::Email),
            subject: trim(ContactField::Subject),
            message: trim(ContactField::Message),
        }
    }
}

/// Per-field error messages displayed next to the inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormErrors(ValidationIssues);

impl ContactFormErrors {
    pub fn get(&self, field: ContactField) -> Option<FieldIssue> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Revalidates a single field. The error state of all other fields stays
    /// as it is.
    pub fn validate_field(&mut self, field: ContactField, value: &str) -> Result<(), FieldIssue> {
        let result = field.validate(value);
        self.0.set(field, result);
        result
    }

    /// Revalidates the whole form, replacing all previous errors.
    pub fn validate_all(&mut self, input: ContactSubmissionInput) -> Option<ContactSubmission> {
        match input.validate() {
            Ok(submission) => {
                self.0 = ValidationIssues::default();
                Some(submission)
            }
            Err(issues) => {
                self.0 = issues;
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormStatus {
    #[default]
    Idle,
    Ok,
    Error,
}

impl FormStatus {
    /// The banner shown below the form, if any.
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Ok => Some("Thanks! Your message has been sent."),
            Self::Error => Some("Your message could not be sent. Please try again."),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreparedSubmission {
    /// The honeypot was filled in, the submission is dropped silently.
    Ignored,
    /// At least one field is invalid, see [`ContactForm::errors`].
    Invalid,
    Ready(ContactSubmission),
}

#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    errors: ContactFormErrors,
    status: FormStatus,
    submitting: bool,
}

impl ContactForm {
    pub fn errors(&self) -> &ContactFormErrors {
        &self.errors
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Called when an input loses focus.
    pub fn blur(&mut self, field: ContactField, value: &str) -> Result<(), FieldIssue> {
        self.errors.validate_field(field, value)
    }

    /// Starts a submission. Returns the submission to send if the form is
    /// valid, in which case [`ContactForm::finish`] must be called with the
    /// outcome of the request.
    pub fn prepare(&mut self, values: &ContactFormValues) -> PreparedSubmission {
        self.status = FormStatus::Idle;

        if !values.website.is_empty() {
            return PreparedSubmission::Ignored;
        }

        match self.errors.validate_all(values.trimmed()) {
            Some(submission) => {
                self.submitting = true;
                PreparedSubmission::Ready(submission)
            }
            None => PreparedSubmission::Invalid,
        }
    }

    /// Records the outcome of a submission. `delivered` is `true` only for a
    /// successful response, every other response or transport failure is
    /// reported the same way.
    pub fn finish(&mut self, delivered: bool) {
        self.submitting = false;
        self.status = if delivered {
            FormStatus::Ok
        } else {
            FormStatus::Error
        };
    }
}

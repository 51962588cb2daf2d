use std::{sync::LazyLock, time::Duration};

use regex::Regex;

use crate::{
    contact::relay::Relay,
    foundation::{core::FrameStep, error::KloudyResult},
};

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Please enter a valid email";
pub const MESSAGE_REQUIRED: &str = "Message is required";
pub const MESSAGE_TOO_SHORT: &str = "Message must be at least 10 characters";
pub const SUBMIT_FAILED: &str = "Something went wrong. Please try again.";
pub const SUBMIT_SUCCEEDED: &str = "Message sent successfully!";

const MIN_MESSAGE_CHARS: usize = 10;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Per-field validation messages; `None` means the field is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<&'static str>,
    pub message: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.message.is_none()
    }
}

pub fn validate(email: &str, message: &str) -> FieldErrors {
    let email = if email.is_empty() {
        Some(EMAIL_REQUIRED)
    } else if !EMAIL_RE.is_match(email) {
        Some(EMAIL_INVALID)
    } else {
        None
    };
    let message = if message.is_empty() {
        Some(MESSAGE_REQUIRED)
    } else if message.chars().count() < MIN_MESSAGE_CHARS {
        Some(MESSAGE_TOO_SHORT)
    } else {
        None
    };
    FieldErrors { email, message }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// Validated payload handed to the relay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub email: String,
    pub message: String,
}

/// Outcome of pressing submit, before any network traffic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitStep {
    /// The hidden bot-trap field was filled; nothing happens.
    Abandoned,
    /// Validation failed; errors are on the form.
    Invalid,
    /// A submission is already in flight.
    Busy,
    Ready(Submission),
}

/// Headless contact form behind the modal.
#[derive(Clone, Debug)]
pub struct ContactForm {
    email: String,
    message: String,
    botcheck: String,
    errors: FieldErrors,
    status: SubmitStatus,
    open: bool,
    auto_close: Duration,
    close_in: Option<Duration>,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl ContactForm {
    pub fn new(auto_close: Duration) -> Self {
        Self {
            email: String::new(),
            message: String::new(),
            botcheck: String::new(),
            errors: FieldErrors::default(),
            status: SubmitStatus::Idle,
            open: false,
            auto_close,
            close_in: None,
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Failure text shown under the fields, if any.
    pub fn status_message(&self) -> Option<&'static str> {
        match self.status {
            SubmitStatus::Success => Some(SUBMIT_SUCCEEDED),
            SubmitStatus::Error => Some(SUBMIT_FAILED),
            SubmitStatus::Idle | SubmitStatus::Submitting => None,
        }
    }

    /// Open the modal. Status and errors reset; typed contents stay.
    pub fn open(&mut self) {
        self.open = true;
        self.errors = FieldErrors::default();
        if self.status != SubmitStatus::Submitting {
            self.status = SubmitStatus::Idle;
            self.close_in = None;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.errors.email = None;
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.errors.message = None;
    }

    pub fn set_botcheck(&mut self, value: impl Into<String>) {
        self.botcheck = value.into();
    }

    pub fn begin_submit(&mut self) -> SubmitStep {
        if self.status == SubmitStatus::Submitting {
            return SubmitStep::Busy;
        }
        if !self.botcheck.is_empty() {
            tracing::debug!("honeypot filled; submission dropped");
            return SubmitStep::Abandoned;
        }
        self.errors = validate(&self.email, &self.message);
        if !self.errors.is_empty() {
            return SubmitStep::Invalid;
        }
        self.status = SubmitStatus::Submitting;
        self.close_in = None;
        SubmitStep::Ready(Submission {
            email: self.email.clone(),
            message: self.message.clone(),
        })
    }

    /// Apply the relay outcome of a submission started with [`Self::begin_submit`].
    pub fn finish_submit(&mut self, outcome: KloudyResult<()>) {
        if self.status != SubmitStatus::Submitting {
            return;
        }
        match outcome {
            Ok(()) => {
                self.email.clear();
                self.message.clear();
                self.status = SubmitStatus::Success;
                self.close_in = Some(self.auto_close);
            }
            Err(e) => {
                tracing::warn!(error = %e, "contact submission failed");
                self.status = SubmitStatus::Error;
            }
        }
    }

    /// Validate and, if valid, send through `relay`. Returns the status afterwards.
    #[tracing::instrument(skip_all)]
    pub async fn submit(&mut self, relay: &dyn Relay) -> SubmitStatus {
        let SubmitStep::Ready(submission) = self.begin_submit() else {
            return self.status;
        };
        let outcome = relay.send(&submission).await;
        self.finish_submit(outcome);
        self.status
    }

    /// Count down the post-success auto-close.
    pub fn advance(&mut self, step: FrameStep) {
        let Some(left) = self.close_in else {
            return;
        };
        if step.as_secs() < left.as_secs_f64() {
            self.close_in = Some(left.saturating_sub(step.as_duration()));
        } else {
            self.close_in = None;
            self.open = false;
            self.status = SubmitStatus::Idle;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/contact/form.rs"]
mod tests;

//! Controller error taxonomy.

use super::page::PageKind;
use crate::model::knowledge::DraftValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Navigation request that the active page does not allow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    NotAllowed {
        from: PageKind,
        action: &'static str,
    },
    /// `Edit` or delete requested before the detail record arrived.
    DetailNotLoaded,
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAllowed { from, action } => {
                write!(f, "`{action}` is not available on the {} page", from.as_str())
            }
            Self::DetailNotLoaded => write!(f, "knowledge detail is not loaded"),
        }
    }
}

impl Error for TransitionError {}

/// Why a delete was abandoned before any request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// First confirmation declined.
    Declined,
    /// Title prompt dismissed.
    PromptCancelled,
    /// Typed title differs from the record title.
    TitleMismatch,
}

impl AbortReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Declined => "declined",
            Self::PromptCancelled => "prompt_cancelled",
            Self::TitleMismatch => "title_mismatch",
        }
    }
}

/// Failure of a user intent before or instead of a network call.
///
/// Network failures never surface here; they become page-scoped messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    Validation(DraftValidationError),
    ConfirmationAborted(AbortReason),
    /// A submission from this page is already in flight.
    Busy,
    Transition(TransitionError),
}

impl Display for IntentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConfirmationAborted(reason) => {
                write!(f, "deletion aborted: {}", reason.as_str())
            }
            Self::Busy => write!(f, "a request from this page is still in progress"),
            Self::Transition(err) => write!(f, "{err}"),
        }
    }
}

impl Error for IntentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Transition(err) => Some(err),
            Self::ConfirmationAborted(_) | Self::Busy => None,
        }
    }
}

impl From<DraftValidationError> for IntentError {
    fn from(value: DraftValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<TransitionError> for IntentError {
    fn from(value: TransitionError) -> Self {
        Self::Transition(value)
    }
}

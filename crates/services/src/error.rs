//! Shared error types for the services crate.

use thiserror::Error;

use interview_core::model::SessionSummaryError;

/// Errors emitted by the interview session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,

    #[error("session already completed")]
    Completed,

    #[error("cannot advance before an answer is locked")]
    NotAnswered,

    #[error("option index {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
}

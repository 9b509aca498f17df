use thiserror::Error;

/// Errors raised by the progression controller.
///
/// Only `NotFound` and `MissingAnswer` surface to the user as errors; the
/// other kinds degrade to a redirect at the HTTP layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SurveyError {
    #[error("Survey not found: {0}")]
    NotFound(String),

    #[error("Session expired or no survey in progress")]
    SessionExpired,

    #[error("An answer choice is required")]
    MissingAnswer,

    #[error("Survey incomplete: {answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

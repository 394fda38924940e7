use std::fmt;

use shared::domain::QuestionOrdinal;
use thiserror::Error;

use crate::flow::Phase;

/// Failure kinds recorded in the session's `last_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NoAnswerSelected,
    AnswerSubmissionFailed,
    ResultsFetchFailed,
    RecommendationFetchFailed,
}

impl ErrorKind {
    /// Prompt shown to the quiz taker.
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::NoAnswerSelected => "Please select an answer.",
            ErrorKind::AnswerSubmissionFailed => "An error occurred while submitting your answer.",
            ErrorKind::ResultsFetchFailed => "Error fetching results.",
            ErrorKind::RecommendationFetchFailed => "Error fetching workshop recommendation.",
        }
    }

    /// Recommendation failures never block the outcome screens.
    pub fn is_blocking(self) -> bool {
        !matches!(self, ErrorKind::RecommendationFetchFailed)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("no answer selected")]
    NoAnswerSelected,
    #[error("failed to submit answer for question {ordinal}: {reason}")]
    AnswerSubmissionFailed {
        ordinal: QuestionOrdinal,
        reason: String,
    },
    #[error("failed to fetch quiz results: {0}")]
    ResultsFetchFailed(String),
    #[error("failed to fetch workshop recommendation: {0}")]
    RecommendationFetchFailed(String),
    #[error("operation requires phase {expected:?}, session is {actual:?}")]
    InvalidPhase { expected: Phase, actual: Phase },
    #[error("answer option must be 1..=4, got {0}")]
    InvalidOption(u8),
    #[error("a submission is already in flight")]
    SubmissionInFlight,
    #[error("question {0} is not part of the quiz")]
    QuestionOutOfRange(QuestionOrdinal),
    #[error("quiz outcomes are not available yet")]
    OutcomesPending,
}

impl QuizError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            QuizError::NoAnswerSelected => Some(ErrorKind::NoAnswerSelected),
            QuizError::AnswerSubmissionFailed { .. } => Some(ErrorKind::AnswerSubmissionFailed),
            QuizError::ResultsFetchFailed(_) => Some(ErrorKind::ResultsFetchFailed),
            QuizError::RecommendationFetchFailed(_) => Some(ErrorKind::RecommendationFetchFailed),
            QuizError::InvalidPhase { .. }
            | QuizError::InvalidOption(_)
            | QuizError::SubmissionInFlight
            | QuizError::QuestionOutOfRange(_)
            | QuizError::OutcomesPending => None,
        }
    }
}

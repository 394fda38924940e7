use shared::domain::{LearningStyle, QuestionOrdinal};

use crate::{error::ErrorKind, flow::Phase, outcome::WorkshopRecommendation};

/// Notifications published while a quiz session progresses.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    PhaseChanged(Phase),
    QuestionAdvanced(QuestionOrdinal),
    AnswerRejected(ErrorKind),
    OutcomesReady { dominant: LearningStyle },
    OutcomesFailed(String),
    RecommendationReady(WorkshopRecommendation),
    RecommendationFailed(String),
}

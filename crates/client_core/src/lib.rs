//! Client side of the image quiz: question sequencing, answer submission,
//! outcome aggregation and the outcome screen carousel.

pub mod answer_store;
pub mod carousel;
pub mod config;
pub mod error;
pub mod events;
pub mod flow;
pub mod hotspots;
pub mod outcome;
pub mod sequencer;
pub mod service;

pub use answer_store::{Answer, AnswerStore};
pub use carousel::{OutcomeCarousel, OutcomeScreen};
pub use config::{load_settings, QuizSettings, SubmissionPolicy};
pub use error::{ErrorKind, QuizError};
pub use events::QuizEvent;
pub use flow::{Phase, Progress, QuestionView, QuizFlowController, SessionSnapshot, SubmitOutcome};
pub use outcome::{
    LearningStyleOutcome, OutcomeAggregator, Outcomes, WellbeingEntry, WellbeingOutcome,
    WorkshopRecommendation,
};
pub use sequencer::category_of;
pub use service::{HttpScoringService, ScoringService};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

//! Quiz session state machine: NotStarted -> InProgress -> Complete.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::domain::{AnswerOption, Category, QuestionOrdinal};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    answer_store::{Answer, AnswerStore},
    config::{QuizSettings, SubmissionPolicy},
    error::{ErrorKind, QuizError},
    events::QuizEvent,
    hotspots::{self, Hotspot},
    outcome::{OutcomeAggregator, Outcomes, WorkshopRecommendation},
    sequencer::{category_of, is_final},
    service::{bounded, ScoringService},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub question: QuestionOrdinal,
    pub selected_option: Option<AnswerOption>,
    pub last_error: Option<ErrorKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    pub ordinal: QuestionOrdinal,
    pub category: Category,
    pub hotspots: Vec<Hotspot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Advanced(QuestionOrdinal),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub answer: Answer,
    pub progress: Progress,
    /// False when an optimistic submission was not accepted by the scoring service.
    pub delivered: bool,
}

struct Session {
    phase: Phase,
    question: QuestionOrdinal,
    answers: AnswerStore,
}

impl Session {
    fn require(&self, expected: Phase) -> Result<(), QuizError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(QuizError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }
}

/// Held while a submission is outstanding; released on drop, including when
/// the submitting future is cancelled.
struct SubmissionSlot<'a>(&'a AtomicBool);

impl<'a> SubmissionSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmissionSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct QuizFlowController {
    service: Arc<dyn ScoringService>,
    aggregator: OutcomeAggregator,
    policy: SubmissionPolicy,
    call_timeout: Duration,
    session: Mutex<Session>,
    submitting: AtomicBool,
    events: broadcast::Sender<QuizEvent>,
}

impl QuizFlowController {
    pub fn new(service: Arc<dyn ScoringService>, settings: &QuizSettings) -> Self {
        let (events, _) = broadcast::channel(64);
        let aggregator = OutcomeAggregator::new(
            Arc::clone(&service),
            settings.interest_area.clone(),
            settings.service_timeout,
            events.clone(),
        );
        Self {
            service,
            aggregator,
            policy: settings.submission_policy,
            call_timeout: settings.service_timeout,
            session: Mutex::new(Session {
                phase: Phase::NotStarted,
                question: QuestionOrdinal::FIRST,
                answers: AnswerStore::default(),
            }),
            submitting: AtomicBool::new(false),
            events,
        }
    }

    pub fn policy(&self) -> SubmissionPolicy {
        self.policy
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<QuizEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await;
        SessionSnapshot {
            phase: session.phase,
            question: session.question,
            selected_option: session.answers.selected(),
            last_error: session.answers.last_error(),
        }
    }

    pub async fn outcomes(&self) -> Outcomes {
        self.aggregator.outcomes().await
    }

    /// The question to render, if the quiz is in progress.
    pub async fn current_question(&self) -> Option<QuestionView> {
        let session = self.session.lock().await;
        if session.phase != Phase::InProgress {
            return None;
        }
        category_of(session.question).map(|category| QuestionView {
            ordinal: session.question,
            category,
            hotspots: hotspots::layout(),
        })
    }

    pub async fn start(&self) -> Result<(), QuizError> {
        let mut session = self.session.lock().await;
        session.require(Phase::NotStarted)?;
        session.phase = Phase::InProgress;
        session.question = QuestionOrdinal::FIRST;
        info!(policy = %self.policy, "quiz: started");
        let _ = self.events.send(QuizEvent::PhaseChanged(Phase::InProgress));
        Ok(())
    }

    pub async fn select_option(&self, option: AnswerOption) -> Result<(), QuizError> {
        let mut session = self.session.lock().await;
        session.require(Phase::InProgress)?;
        session.answers.select(option);
        debug!(ordinal = %session.question, option = option.get(), "quiz: option selected");
        Ok(())
    }

    /// Selects `option` and submits it in one step, the way a hotspot click does.
    pub async fn answer(&self, option: AnswerOption) -> Result<SubmitOutcome, QuizError> {
        self.select_option(option).await?;
        self.submit().await
    }

    /// Sends the selected option to the scoring service and advances per the
    /// configured [`SubmissionPolicy`]. Submitting the final question
    /// completes the quiz and fetches the outcomes.
    ///
    /// Only one delivery is outstanding at a time. Under the optimistic policy
    /// that includes the next question: its submit returns
    /// [`QuizError::SubmissionInFlight`] until the previous delivery settles,
    /// keeping answers in question order on the wire.
    pub async fn submit(&self) -> Result<SubmitOutcome, QuizError> {
        let (slot, answer, optimistic_progress) = {
            let mut session = self.session.lock().await;
            session.require(Phase::InProgress)?;
            let ordinal = session.question;
            let category = category_of(ordinal).ok_or(QuizError::QuestionOutOfRange(ordinal))?;
            let Some(answer) = session.answers.answer_for(ordinal, category) else {
                session.answers.record_error(ErrorKind::NoAnswerSelected);
                let _ = self
                    .events
                    .send(QuizEvent::AnswerRejected(ErrorKind::NoAnswerSelected));
                return Err(QuizError::NoAnswerSelected);
            };
            let slot = SubmissionSlot::acquire(&self.submitting).ok_or_else(|| {
                debug!(%ordinal, "quiz: submission ignored while another is in flight");
                QuizError::SubmissionInFlight
            })?;
            session.answers.clear_error();
            let progress = match self.policy {
                SubmissionPolicy::Optimistic => Some(self.advance(&mut session)),
                SubmissionPolicy::Confirmed => None,
            };
            (slot, answer, progress)
        };

        info!(
            ordinal = %answer.ordinal,
            category = %answer.category,
            option = answer.option.get(),
            policy = %self.policy,
            "quiz: submitting answer"
        );
        let delivery = bounded(
            self.call_timeout,
            self.service.submit_answer(answer.category, answer.option),
        )
        .await;

        let (progress, delivered) = match (optimistic_progress, delivery) {
            (Some(progress), Ok(())) => (progress, true),
            (Some(progress), Err(reason)) => {
                self.submission_failed(&answer, &reason).await;
                (progress, false)
            }
            (None, Ok(())) => {
                let mut session = self.session.lock().await;
                if session.phase == Phase::InProgress && session.question == answer.ordinal {
                    (self.advance(&mut session), true)
                } else {
                    warn!(ordinal = %answer.ordinal, "quiz: session moved during submission, not advancing");
                    return Err(QuizError::SubmissionInFlight);
                }
            }
            (None, Err(reason)) => {
                self.submission_failed(&answer, &reason).await;
                return Err(QuizError::AnswerSubmissionFailed {
                    ordinal: answer.ordinal,
                    reason,
                });
            }
        };
        drop(slot);

        if progress == Progress::Completed {
            self.fetch_results_on_completion().await;
        }

        Ok(SubmitOutcome {
            answer,
            progress,
            delivered,
        })
    }

    /// Re-runs the results fetch after a failure. Populated outcomes are
    /// returned as they are.
    pub async fn retry_results(&self) -> Result<Outcomes, QuizError> {
        self.session.lock().await.require(Phase::Complete)?;
        self.fetch_results().await
    }

    pub async fn retry_recommendation(&self) -> Result<WorkshopRecommendation, QuizError> {
        self.session.lock().await.require(Phase::Complete)?;
        self.aggregator.retry_recommendation().await
    }

    /// Moves to the next question, or to `Complete` after the final one.
    /// The caller that receives `Progress::Completed` owns the results fetch.
    fn advance(&self, session: &mut Session) -> Progress {
        session.answers.clear_selection();
        if is_final(session.question) {
            session.phase = Phase::Complete;
            info!(ordinal = %session.question, "quiz: complete");
            let _ = self.events.send(QuizEvent::PhaseChanged(Phase::Complete));
            Progress::Completed
        } else {
            session.question = session.question.next();
            let _ = self
                .events
                .send(QuizEvent::QuestionAdvanced(session.question));
            Progress::Advanced(session.question)
        }
    }

    async fn submission_failed(&self, answer: &Answer, reason: &str) {
        warn!(
            ordinal = %answer.ordinal,
            category = %answer.category,
            %reason,
            "quiz: answer submission failed"
        );
        self.session
            .lock()
            .await
            .answers
            .record_error(ErrorKind::AnswerSubmissionFailed);
        let _ = self
            .events
            .send(QuizEvent::AnswerRejected(ErrorKind::AnswerSubmissionFailed));
    }

    async fn fetch_results_on_completion(&self) {
        // Failure is recorded in the session and can be retried.
        let _ = self.fetch_results().await;
    }

    async fn fetch_results(&self) -> Result<Outcomes, QuizError> {
        match self.aggregator.fetch_results().await {
            Ok(outcomes) => {
                let mut session = self.session.lock().await;
                if session.answers.last_error() == Some(ErrorKind::ResultsFetchFailed) {
                    session.answers.clear_error();
                }
                Ok(outcomes)
            }
            Err(err) => {
                if let Some(kind) = err.kind() {
                    self.session.lock().await.answers.record_error(kind);
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/flow_tests.rs"]
mod tests;

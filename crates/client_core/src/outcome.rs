//! Turns the scoring service's results summary into learning-style and
//! wellbeing outcomes, and chains the workshop recommendation lookup off the
//! dominant learning style.

use std::{fmt, sync::Arc, time::Duration};

use shared::{
    domain::LearningStyle,
    protocol::{WellbeingResults, WellbeingScore},
};
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{info, warn};

use crate::{
    error::QuizError,
    events::QuizEvent,
    service::{bounded, ScoringService},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedOutcome {
    #[error("learning style scores need a dominant index and 4 percentages, got {0} values")]
    WrongLength(usize),
    #[error("dominant learning style index {0} does not address a style")]
    DominantOutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LearningStyleOutcome {
    dominant: LearningStyle,
    percentages: [f64; 4],
}

impl LearningStyleOutcome {
    /// Parses `[dominant_index, visual, auditory, reading_writing, kinesthetic]`.
    pub fn from_scores(scores: &[f64]) -> Result<Self, MalformedOutcome> {
        let [index, visual, auditory, reading_writing, kinesthetic] = scores else {
            return Err(MalformedOutcome::WrongLength(scores.len()));
        };
        let dominant = (index.fract() == 0.0 && *index >= 1.0)
            .then(|| LearningStyle::from_wire_index(*index as usize))
            .flatten()
            .ok_or(MalformedOutcome::DominantOutOfRange(*index))?;

        Ok(Self {
            dominant,
            percentages: [*visual, *auditory, *reading_writing, *kinesthetic],
        })
    }

    pub fn dominant(&self) -> LearningStyle {
        self.dominant
    }

    pub fn percentages(&self) -> &[f64; 4] {
        &self.percentages
    }

    pub fn percentage_of(&self, style: LearningStyle) -> f64 {
        self.percentages[style.position()]
    }

    pub fn breakdown(&self) -> impl Iterator<Item = (LearningStyle, f64)> + '_ {
        LearningStyle::ALL
            .iter()
            .map(|style| (*style, self.percentage_of(*style)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WellbeingEntry {
    pub category: String,
    pub score: f64,
    pub recommendation: String,
}

/// Wellbeing categories in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WellbeingOutcome {
    entries: Vec<WellbeingEntry>,
}

impl WellbeingOutcome {
    pub fn entries(&self) -> &[WellbeingEntry] {
        &self.entries
    }

    pub fn get(&self, category: &str) -> Option<&WellbeingEntry> {
        self.entries.iter().find(|entry| entry.category == category)
    }
}

impl From<WellbeingResults> for WellbeingOutcome {
    fn from(results: WellbeingResults) -> Self {
        let entries = results
            .0
            .into_iter()
            .map(
                |(
                    category,
                    WellbeingScore {
                        score,
                        recommendation,
                    },
                )| WellbeingEntry {
                    category,
                    score,
                    recommendation,
                },
            )
            .collect();
        Self { entries }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopRecommendation(pub String);

impl fmt::Display for WorkshopRecommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcomes {
    pub learning_style: Option<LearningStyleOutcome>,
    pub wellbeing: Option<WellbeingOutcome>,
    pub recommendation: Option<WorkshopRecommendation>,
}

impl Outcomes {
    pub fn is_populated(&self) -> bool {
        self.learning_style.is_some() && self.wellbeing.is_some()
    }
}

pub struct OutcomeAggregator {
    service: Arc<dyn ScoringService>,
    interest_area: String,
    call_timeout: Duration,
    outcomes: Mutex<Outcomes>,
    results_fetch: Mutex<()>,
    events: broadcast::Sender<QuizEvent>,
}

impl OutcomeAggregator {
    pub fn new(
        service: Arc<dyn ScoringService>,
        interest_area: impl Into<String>,
        call_timeout: Duration,
        events: broadcast::Sender<QuizEvent>,
    ) -> Self {
        Self {
            service,
            interest_area: interest_area.into(),
            call_timeout,
            outcomes: Mutex::new(Outcomes::default()),
            results_fetch: Mutex::new(()),
            events,
        }
    }

    pub fn interest_area(&self) -> &str {
        &self.interest_area
    }

    pub async fn outcomes(&self) -> Outcomes {
        self.outcomes.lock().await.clone()
    }

    /// Fetches and stores the results summary, then looks up the workshop
    /// recommendation for the dominant learning style.
    ///
    /// Outcomes are immutable once populated; later calls return them without
    /// contacting the scoring service. A failed recommendation lookup does not
    /// fail this call.
    pub async fn fetch_results(&self) -> Result<Outcomes, QuizError> {
        let _fetching = self.results_fetch.lock().await;
        {
            let outcomes = self.outcomes.lock().await;
            if outcomes.is_populated() {
                return Ok(outcomes.clone());
            }
        }

        let summary = bounded(self.call_timeout, self.service.fetch_results_summary())
            .await
            .map_err(|reason| self.results_failed(reason))?;
        let learning_style = LearningStyleOutcome::from_scores(&summary.learning_style)
            .map_err(|err| self.results_failed(err.to_string()))?;
        let wellbeing = WellbeingOutcome::from(summary.wellbeing_results);

        let dominant = learning_style.dominant();
        let learning_style_changed = {
            let mut outcomes = self.outcomes.lock().await;
            let changed = outcomes.learning_style.as_ref() != Some(&learning_style);
            outcomes.learning_style = Some(learning_style);
            outcomes.wellbeing = Some(wellbeing);
            changed
        };
        info!(dominant = %dominant, "quiz: outcomes populated");
        let _ = self.events.send(QuizEvent::OutcomesReady { dominant });

        if learning_style_changed {
            self.learning_style_changed(dominant).await;
        }

        Ok(self.outcomes().await)
    }

    /// Looks up the workshop recommendation. Failures are reported but leave
    /// every other outcome untouched.
    pub async fn fetch_recommendation(
        &self,
        interest_area: &str,
        learning_style: &str,
    ) -> Result<WorkshopRecommendation, QuizError> {
        let response = bounded(
            self.call_timeout,
            self.service
                .fetch_workshop_recommendation(interest_area, learning_style),
        )
        .await
        .map_err(|reason| {
            warn!(
                interest_area,
                learning_style,
                %reason,
                "quiz: workshop recommendation lookup failed"
            );
            let _ = self
                .events
                .send(QuizEvent::RecommendationFailed(reason.clone()));
            QuizError::RecommendationFetchFailed(reason)
        })?;

        let recommendation = WorkshopRecommendation(response.recommendation);
        self.outcomes.lock().await.recommendation = Some(recommendation.clone());
        info!(interest_area, learning_style, "quiz: workshop recommendation received");
        let _ = self
            .events
            .send(QuizEvent::RecommendationReady(recommendation.clone()));
        Ok(recommendation)
    }

    /// Repeats the recommendation lookup for the stored dominant style.
    pub async fn retry_recommendation(&self) -> Result<WorkshopRecommendation, QuizError> {
        let dominant = self
            .outcomes
            .lock()
            .await
            .learning_style
            .as_ref()
            .map(LearningStyleOutcome::dominant)
            .ok_or(QuizError::OutcomesPending)?;
        self.fetch_recommendation(&self.interest_area, dominant.name())
            .await
    }

    async fn learning_style_changed(&self, dominant: LearningStyle) {
        // Best effort: failures were already logged and published.
        let _ = self
            .fetch_recommendation(&self.interest_area, dominant.name())
            .await;
    }

    fn results_failed(&self, reason: String) -> QuizError {
        warn!(%reason, "quiz: results summary fetch failed");
        let _ = self.events.send(QuizEvent::OutcomesFailed(reason.clone()));
        QuizError::ResultsFetchFailed(reason)
    }
}

#[cfg(test)]
#[path = "tests/outcome_tests.rs"]
mod tests;

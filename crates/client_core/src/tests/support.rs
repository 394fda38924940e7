//! In-memory scoring service double shared by the unit tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{AnswerOption, Category},
    protocol::{RecommendationResponse, ResultsSummary, WellbeingResults, WellbeingScore},
};
use tokio::sync::{Mutex, Notify};

use crate::service::ScoringService;

pub(crate) fn option(value: u8) -> AnswerOption {
    AnswerOption::new(value).expect("valid option")
}

pub(crate) fn summary(learning_style: &[f64]) -> ResultsSummary {
    ResultsSummary {
        learning_style: learning_style.to_vec(),
        wellbeing_results: WellbeingResults(vec![
            (
                "Stress".to_string(),
                WellbeingScore {
                    score: 4.0,
                    recommendation: "Try a breathing routine".to_string(),
                },
            ),
            (
                "Sleep".to_string(),
                WellbeingScore {
                    score: 7.0,
                    recommendation: "Keep a regular schedule".to_string(),
                },
            ),
        ]),
    }
}

/// Blocks `submit_answer` until released, so a test can observe an
/// outstanding submission.
#[derive(Clone, Default)]
pub(crate) struct SubmitGate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

pub(crate) struct ScriptedScoring {
    pub submissions: Arc<Mutex<Vec<(Category, AnswerOption)>>>,
    pub summary_calls: Arc<AtomicUsize>,
    pub recommendation_requests: Arc<Mutex<Vec<(String, String)>>>,
    pending_failures: Mutex<usize>,
    failing_submission: Option<usize>,
    hang_submissions: bool,
    summaries: Mutex<VecDeque<Result<ResultsSummary, String>>>,
    fallback_summary: ResultsSummary,
    recommendation_error: Option<String>,
    gate: Option<SubmitGate>,
}

impl ScriptedScoring {
    pub fn ok() -> Self {
        Self {
            submissions: Arc::new(Mutex::new(Vec::new())),
            summary_calls: Arc::new(AtomicUsize::new(0)),
            recommendation_requests: Arc::new(Mutex::new(Vec::new())),
            pending_failures: Mutex::new(0),
            failing_submission: None,
            hang_submissions: false,
            summaries: Mutex::new(VecDeque::new()),
            fallback_summary: summary(&[2.0, 10.0, 60.0, 20.0, 10.0]),
            recommendation_error: None,
            gate: None,
        }
    }

    /// Fails the next `count` submissions before accepting again.
    pub fn failing_submissions(self, count: usize) -> Self {
        Self {
            pending_failures: Mutex::new(count),
            ..self
        }
    }

    /// Fails only the `nth` submission (1-based).
    pub fn failing_submission(mut self, nth: usize) -> Self {
        self.failing_submission = Some(nth);
        self
    }

    pub fn hanging_submissions(mut self) -> Self {
        self.hang_submissions = true;
        self
    }

    pub fn with_summary(mut self, summary: ResultsSummary) -> Self {
        self.fallback_summary = summary;
        self
    }

    /// Queues one-shot results-summary responses served before the fallback.
    pub fn with_summary_script(self, script: Vec<Result<ResultsSummary, String>>) -> Self {
        Self {
            summaries: Mutex::new(script.into()),
            ..self
        }
    }

    pub fn failing_recommendation(mut self, err: impl Into<String>) -> Self {
        self.recommendation_error = Some(err.into());
        self
    }

    pub fn gated(mut self, gate: SubmitGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringService for ScriptedScoring {
    async fn submit_answer(&self, category: Category, option: AnswerOption) -> Result<()> {
        let submitted = {
            let mut submissions = self.submissions.lock().await;
            submissions.push((category, option));
            submissions.len()
        };
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        if self.hang_submissions {
            std::future::pending::<()>().await;
        }

        if self.failing_submission == Some(submitted) {
            return Err(anyhow!("scoring service rejected answer {submitted}"));
        }
        let mut failing = self.pending_failures.lock().await;
        if *failing > 0 {
            *failing -= 1;
            return Err(anyhow!("scoring service rejected answer"));
        }
        Ok(())
    }

    async fn fetch_results_summary(&self) -> Result<ResultsSummary> {
        self.summary_calls.fetch_add(1, Ordering::SeqCst);
        match self.summaries.lock().await.pop_front() {
            Some(scripted) => scripted.map_err(|err| anyhow!(err)),
            None => Ok(self.fallback_summary.clone()),
        }
    }

    async fn fetch_workshop_recommendation(
        &self,
        interest_area: &str,
        learning_style: &str,
    ) -> Result<RecommendationResponse> {
        self.recommendation_requests
            .lock()
            .await
            .push((interest_area.to_string(), learning_style.to_string()));
        if let Some(err) = &self.recommendation_error {
            return Err(anyhow!(err.clone()));
        }
        Ok(RecommendationResponse {
            recommendation: format!("{interest_area} workshop for {learning_style} learners"),
        })
    }
}

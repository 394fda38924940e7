use std::{future::Future, time::Duration};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::{AnswerOption, Category},
    error::{ApiError, ApiException},
    protocol::{
        answer_path, AnswerRequest, RecommendationQuery, RecommendationResponse, ResultsSummary,
        RECOMMENDATION_PATH, RESULTS_SUMMARY_PATH,
    },
};
use tracing::debug;

/// The external collaborator that scores answers and produces outcomes.
#[async_trait]
pub trait ScoringService: Send + Sync {
    async fn submit_answer(&self, category: Category, option: AnswerOption) -> Result<()>;
    async fn fetch_results_summary(&self) -> Result<ResultsSummary>;
    async fn fetch_workshop_recommendation(
        &self,
        interest_area: &str,
        learning_style: &str,
    ) -> Result<RecommendationResponse>;
}

pub struct HttpScoringService {
    http: Client,
    base_url: String,
}

impl HttpScoringService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl ScoringService for HttpScoringService {
    async fn submit_answer(&self, category: Category, option: AnswerOption) -> Result<()> {
        let url = self.endpoint(answer_path(category));
        debug!(%category, option = option.get(), %url, "scoring: submitting answer");
        let response = self
            .http
            .post(&url)
            .json(&AnswerRequest { option })
            .send()
            .await
            .with_context(|| format!("failed to reach scoring service at {url}"))?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_results_summary(&self) -> Result<ResultsSummary> {
        let url = self.endpoint(RESULTS_SUMMARY_PATH);
        debug!(%url, "scoring: fetching results summary");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("failed to reach scoring service at {url}"))?;
        ensure_success(response)
            .await?
            .json()
            .await
            .context("malformed results summary")
    }

    async fn fetch_workshop_recommendation(
        &self,
        interest_area: &str,
        learning_style: &str,
    ) -> Result<RecommendationResponse> {
        let url = self.endpoint(RECOMMENDATION_PATH);
        debug!(interest_area, learning_style, %url, "scoring: fetching workshop recommendation");
        let response = self
            .http
            .get(&url)
            .query(&RecommendationQuery {
                interest_area: interest_area.to_string(),
                learning_style: learning_style.to_string(),
            })
            .send()
            .await
            .with_context(|| format!("failed to reach scoring service at {url}"))?;
        ensure_success(response)
            .await?
            .json()
            .await
            .context("malformed workshop recommendation")
    }
}

/// Runs a scoring call under `limit`, flattening transport errors and expiry into a reason.
pub(crate) async fn bounded<T, F>(limit: Duration, call: F) -> std::result::Result<T, String>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(format!("{err:#}")),
        Err(_) => Err(format!("timed out after {}ms", limit.as_millis())),
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ApiError>(&body) {
        Ok(api_error) => Err(ApiException::new(status.as_u16(), api_error).into()),
        Err(_) if body.trim().is_empty() => Err(anyhow!("scoring service responded {status}")),
        Err(_) => Err(anyhow!("scoring service responded {status}: {}", body.trim())),
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;

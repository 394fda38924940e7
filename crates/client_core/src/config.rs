use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::{bail, Context};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SETTINGS_FILE: &str = "quiz.toml";

/// When a submitted answer moves the quiz forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPolicy {
    /// Advance immediately, whatever the scoring service answers.
    Optimistic,
    /// Advance only once the scoring service accepted the answer.
    #[default]
    Confirmed,
}

#[derive(Debug, Error)]
#[error("unknown submission policy '{0}', expected 'optimistic' or 'confirmed'")]
pub struct ParsePolicyError(String);

impl FromStr for SubmissionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimistic" => Ok(SubmissionPolicy::Optimistic),
            "confirmed" => Ok(SubmissionPolicy::Confirmed),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}

impl fmt::Display for SubmissionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionPolicy::Optimistic => f.write_str("optimistic"),
            SubmissionPolicy::Confirmed => f.write_str("confirmed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    pub scoring_url: String,
    pub submission_policy: SubmissionPolicy,
    pub service_timeout: Duration,
    pub interest_area: String,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            scoring_url: "http://localhost:8080".into(),
            submission_policy: SubmissionPolicy::Confirmed,
            service_timeout: Duration::from_secs(10),
            interest_area: "Finance".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    scoring_url: Option<String>,
    submission_policy: Option<SubmissionPolicy>,
    service_timeout_ms: Option<u64>,
    interest_area: Option<String>,
}

/// Defaults, then the TOML file, then environment overrides.
///
/// With no explicit path, `quiz.toml` in the working directory is read if it
/// exists. An explicit path must exist.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<QuizSettings> {
    let mut settings = QuizSettings::default();

    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };
    if required || path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    validate(&settings)?;
    Ok(settings)
}

fn apply_file(settings: &mut QuizSettings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.scoring_url {
        settings.scoring_url = v;
    }
    if let Some(v) = file_cfg.submission_policy {
        settings.submission_policy = v;
    }
    if let Some(v) = file_cfg.service_timeout_ms {
        settings.service_timeout = Duration::from_millis(v);
    }
    if let Some(v) = file_cfg.interest_area {
        settings.interest_area = v;
    }
    Ok(())
}

fn apply_env(
    settings: &mut QuizSettings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("QUIZ_SCORING_URL") {
        settings.scoring_url = v;
    }
    if let Some(v) = lookup("APP__SCORING_URL") {
        settings.scoring_url = v;
    }

    if let Some(v) = lookup("QUIZ_SUBMISSION_POLICY") {
        settings.submission_policy = v.parse()?;
    }

    if let Some(v) = lookup("QUIZ_SERVICE_TIMEOUT_MS") {
        let millis = v
            .trim()
            .parse::<u64>()
            .with_context(|| format!("QUIZ_SERVICE_TIMEOUT_MS must be milliseconds, got '{v}'"))?;
        settings.service_timeout = Duration::from_millis(millis);
    }

    if let Some(v) = lookup("QUIZ_INTEREST_AREA") {
        settings.interest_area = v;
    }

    Ok(())
}

pub fn validate(settings: &QuizSettings) -> anyhow::Result<()> {
    let url = Url::parse(&settings.scoring_url)
        .with_context(|| format!("invalid scoring url '{}'", settings.scoring_url))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("scoring url must use http or https, got '{}'", url.scheme());
    }
    if settings.service_timeout.is_zero() {
        bail!("service timeout must be greater than zero");
    }
    if settings.interest_area.trim().is_empty() {
        bail!("interest area must not be empty");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;

use std::{
    fmt::{self, Write as _},
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use anyhow::Result;
use clap::Parser;
use client_core::{
    config::validate, load_settings, ErrorKind, HttpScoringService, OutcomeCarousel,
    OutcomeScreen, Outcomes, Progress, QuizError, QuizFlowController, SubmissionPolicy,
};
use shared::domain::{AnswerOption, Category};
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Parser, Debug)]
#[command(about = "Take the nine-question image quiz against a scoring service")]
struct Args {
    /// Settings file; defaults to quiz.toml in the working directory when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    scoring_url: Option<String>,
    #[arg(long)]
    policy: Option<SubmissionPolicy>,
    #[arg(long)]
    timeout_ms: Option<u64>,
    #[arg(long)]
    interest_area: Option<String>,
}

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.scoring_url {
        settings.scoring_url = url;
    }
    if let Some(policy) = args.policy {
        settings.submission_policy = policy;
    }
    if let Some(ms) = args.timeout_ms {
        settings.service_timeout = Duration::from_millis(ms);
    }
    if let Some(area) = args.interest_area {
        settings.interest_area = area;
    }
    validate(&settings)?;

    let service = Arc::new(HttpScoringService::new(settings.scoring_url.clone()));
    let controller = QuizFlowController::new(service, &settings);
    let mut input = BufReader::new(io::stdin()).lines();

    println!(
        "Image quiz ({} answers). Press Enter to start.",
        settings.submission_policy
    );
    if input.next_line().await?.is_none() {
        return Ok(());
    }
    controller.start().await?;

    if !run_questions(&controller, &mut input).await? {
        return Ok(());
    }
    show_outcomes(&controller, &mut input).await
}

/// Returns false when input ends before the quiz completes.
async fn run_questions(controller: &QuizFlowController, input: &mut Input) -> Result<bool> {
    loop {
        let Some(question) = controller.current_question().await else {
            return Ok(true);
        };
        let label = match question.category {
            Category::LearningStyle => "learning style",
            Category::Wellbeing => "wellbeing",
        };
        println!("\nQuestion {} ({label}) - pick 1-4:", question.ordinal);

        let Some(line) = input.next_line().await? else {
            return Ok(false);
        };
        let line = line.trim();
        let result = if line.is_empty() {
            // Enter with a pending selection resubmits it.
            controller.submit().await
        } else {
            match line.parse::<u8>().ok().and_then(AnswerOption::new) {
                Some(option) => controller.answer(option).await,
                None => {
                    println!("Please enter a number from 1 to 4.");
                    continue;
                }
            }
        };

        match result {
            Ok(outcome) => {
                if !outcome.delivered {
                    println!("{}", ErrorKind::AnswerSubmissionFailed);
                }
                if outcome.progress == Progress::Completed {
                    println!("\nThanks! Your answers are in.");
                }
            }
            Err(err) => match err.kind() {
                Some(kind) => {
                    println!("{kind}");
                    if matches!(err, QuizError::AnswerSubmissionFailed { .. }) {
                        println!("Press Enter to try again, or pick another option.");
                    }
                }
                None => println!("{err}"),
            },
        }
    }
}

async fn show_outcomes(controller: &QuizFlowController, input: &mut Input) -> Result<()> {
    let mut carousel = OutcomeCarousel::default();
    loop {
        let outcomes = controller.outcomes().await;
        if let Some(kind) = controller.snapshot().await.last_error {
            println!("{kind}");
        }
        print!("{}", render(carousel.current_screen(&outcomes), &outcomes));
        println!("\n[n]ext screen, [r]etry, [q]uit");

        let Some(line) = input.next_line().await? else {
            return Ok(());
        };
        match line.trim() {
            "q" | "quit" => return Ok(()),
            "r" | "retry" => {
                if !controller.outcomes().await.is_populated() {
                    if let Err(err) = controller.retry_results().await {
                        println!("{err}");
                    }
                } else if let Err(err) = controller.retry_recommendation().await {
                    println!("{err}");
                }
            }
            _ => {
                carousel.advance();
            }
        }
    }
}

fn render(screen: OutcomeScreen, outcomes: &Outcomes) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_screen(&mut out, screen, outcomes);
    out
}

fn write_screen(out: &mut String, screen: OutcomeScreen, outcomes: &Outcomes) -> fmt::Result {
    match screen {
        OutcomeScreen::Generic => {
            writeln!(out, "\nYour results")?;
            if outcomes.is_populated() {
                writeln!(out, "Thanks for taking the quiz. Press n to see your profile.")?;
            } else {
                writeln!(out, "Results are not available yet.")?;
            }
        }
        OutcomeScreen::LearningStyle => {
            let Some(learning_style) = &outcomes.learning_style else {
                return Ok(());
            };
            writeln!(out, "\nLearning style: {}", learning_style.dominant())?;
            for (style, pct) in learning_style.breakdown() {
                writeln!(out, "  {:<16} {pct:>5.1}%", style.name())?;
            }
            match &outcomes.recommendation {
                Some(recommendation) => writeln!(out, "Recommended workshop: {recommendation}")?,
                None => writeln!(out, "No workshop recommendation yet.")?,
            }
        }
        OutcomeScreen::Wellbeing => {
            let Some(wellbeing) = &outcomes.wellbeing else {
                return Ok(());
            };
            writeln!(out, "\nWellbeing")?;
            for entry in wellbeing.entries() {
                writeln!(
                    out,
                    "  {}: {} - {}",
                    entry.category, entry.score, entry.recommendation
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::{LearningStyleOutcome, WellbeingOutcome, WorkshopRecommendation};
    use shared::protocol::{WellbeingResults, WellbeingScore};

    fn outcomes() -> Outcomes {
        Outcomes {
            learning_style: Some(
                LearningStyleOutcome::from_scores(&[3.0, 10.0, 20.0, 50.0, 20.0])
                    .expect("outcome"),
            ),
            wellbeing: Some(WellbeingOutcome::from(WellbeingResults(vec![(
                "Stress".to_string(),
                WellbeingScore {
                    score: 4.0,
                    recommendation: "Take short breaks".to_string(),
                },
            )]))),
            recommendation: Some(WorkshopRecommendation("Budgeting 101".to_string())),
        }
    }

    #[test]
    fn recommendation_sits_with_the_learning_style_breakdown() {
        let outcomes = outcomes();
        let learning_style = render(OutcomeScreen::LearningStyle, &outcomes);
        assert!(learning_style.contains("Learning style: Reading/Writing"));
        assert!(learning_style.contains("Recommended workshop: Budgeting 101"));

        assert!(!render(OutcomeScreen::Generic, &outcomes).contains("Budgeting 101"));
        assert!(!render(OutcomeScreen::Wellbeing, &outcomes).contains("Budgeting 101"));
    }

    #[test]
    fn missing_recommendation_is_noted_on_learning_style_screen() {
        let outcomes = Outcomes {
            recommendation: None,
            ..outcomes()
        };
        let text = render(OutcomeScreen::LearningStyle, &outcomes);
        assert!(text.contains("No workshop recommendation yet."));
        assert!(text.contains("Reading/Writing"));
    }

    #[test]
    fn generic_screen_reports_pending_results() {
        let text = render(OutcomeScreen::Generic, &Outcomes::default());
        assert!(text.contains("Results are not available yet."));
    }
}

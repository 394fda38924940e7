//! Maps question ordinals to the category they score.

use shared::domain::{Category, QuestionOrdinal};

pub const LEARNING_STYLE_QUESTIONS: u32 = 5;
pub const TOTAL_QUESTIONS: u32 = 9;

/// Category scored by the question at `ordinal`.
///
/// Returns `None` for ordinals outside `1..=TOTAL_QUESTIONS`, so a tenth
/// question is never rendered or submitted.
pub fn category_of(ordinal: QuestionOrdinal) -> Option<Category> {
    match ordinal.0 {
        1..=LEARNING_STYLE_QUESTIONS => Some(Category::LearningStyle),
        n if n > LEARNING_STYLE_QUESTIONS && n <= TOTAL_QUESTIONS => Some(Category::Wellbeing),
        _ => None,
    }
}

pub fn is_final(ordinal: QuestionOrdinal) -> bool {
    ordinal.0 == TOTAL_QUESTIONS
}

#[cfg(test)]
#[path = "tests/sequencer_tests.rs"]
mod tests;

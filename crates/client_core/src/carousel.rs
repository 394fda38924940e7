use crate::outcome::Outcomes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeScreen {
    Generic,
    LearningStyle,
    Wellbeing,
}

pub const OUTCOME_SCREENS: [OutcomeScreen; 3] = [
    OutcomeScreen::Generic,
    OutcomeScreen::LearningStyle,
    OutcomeScreen::Wellbeing,
];

/// Cycles through the terminal outcome screens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeCarousel {
    index: usize,
}

impl OutcomeCarousel {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % OUTCOME_SCREENS.len();
        self.index
    }

    /// Screen to render; falls back to `Generic` while the selected screen's
    /// outcome is missing.
    pub fn current_screen(&self, outcomes: &Outcomes) -> OutcomeScreen {
        match OUTCOME_SCREENS[self.index] {
            OutcomeScreen::LearningStyle if outcomes.learning_style.is_some() => {
                OutcomeScreen::LearningStyle
            }
            OutcomeScreen::Wellbeing if outcomes.wellbeing.is_some() => OutcomeScreen::Wellbeing,
            _ => OutcomeScreen::Generic,
        }
    }
}

#[cfg(test)]
#[path = "tests/carousel_tests.rs"]
mod tests;

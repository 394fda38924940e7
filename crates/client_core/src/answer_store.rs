use shared::domain::{AnswerOption, Category, QuestionOrdinal};

use crate::error::ErrorKind;

/// An answer on its way to the scoring service. Not retained after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub ordinal: QuestionOrdinal,
    pub category: Category,
    pub option: AnswerOption,
}

/// Holds the selected but unsubmitted option and the running error state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    selected: Option<AnswerOption>,
    last_error: Option<ErrorKind>,
}

impl AnswerStore {
    pub fn select(&mut self, option: AnswerOption) {
        self.selected = Some(option);
    }

    pub fn selected(&self) -> Option<AnswerOption> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Builds the answer for the current question without consuming the selection.
    pub fn answer_for(&self, ordinal: QuestionOrdinal, category: Category) -> Option<Answer> {
        self.selected.map(|option| Answer {
            ordinal,
            category,
            option,
        })
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn record_error(&mut self, kind: ErrorKind) {
        self.last_error = Some(kind);
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(value: u8) -> AnswerOption {
        AnswerOption::new(value).expect("valid option")
    }

    #[test]
    fn answer_requires_a_selection() {
        let mut store = AnswerStore::default();
        assert_eq!(
            store.answer_for(QuestionOrdinal(3), Category::LearningStyle),
            None
        );

        store.select(option(2));
        store.select(option(4));
        let answer = store
            .answer_for(QuestionOrdinal(3), Category::LearningStyle)
            .expect("answer");
        assert_eq!(answer.option, option(4));
        assert_eq!(answer.ordinal, QuestionOrdinal(3));
        assert_eq!(store.selected(), Some(option(4)));
    }

    #[test]
    fn errors_are_independent_of_selection() {
        let mut store = AnswerStore::default();
        store.record_error(ErrorKind::NoAnswerSelected);
        store.select(option(1));
        assert_eq!(store.last_error(), Some(ErrorKind::NoAnswerSelected));

        store.clear_error();
        store.clear_selection();
        assert_eq!(store, AnswerStore::default());
    }
}

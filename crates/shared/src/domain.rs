use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    LearningStyle,
    Wellbeing,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::LearningStyle => "learning_style",
            Category::Wellbeing => "wellbeing",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learning styles in the fixed order the scoring service reports percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LearningStyle {
    Visual,
    Auditory,
    ReadingWriting,
    Kinesthetic,
}

impl LearningStyle {
    pub const ALL: [LearningStyle; 4] = [
        LearningStyle::Visual,
        LearningStyle::Auditory,
        LearningStyle::ReadingWriting,
        LearningStyle::Kinesthetic,
    ];

    /// Resolves the 1-based index used on the wire.
    pub fn from_wire_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|position| Self::ALL.get(position).copied())
    }

    pub fn position(self) -> usize {
        match self {
            LearningStyle::Visual => 0,
            LearningStyle::Auditory => 1,
            LearningStyle::ReadingWriting => 2,
            LearningStyle::Kinesthetic => 3,
        }
    }

    /// Name expected by the recommendation endpoint.
    pub fn name(self) -> &'static str {
        match self {
            LearningStyle::Visual => "Visual",
            LearningStyle::Auditory => "Auditory",
            LearningStyle::ReadingWriting => "Reading/Writing",
            LearningStyle::Kinesthetic => "Kinesthetic",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the four hotspot options on a question screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AnswerOption(u8);

impl AnswerOption {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX)
            .contains(&value)
            .then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = AnswerOption> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<u8> for AnswerOption {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("answer option must be 1..=4, got {value}"))
    }
}

impl From<AnswerOption> for u8 {
    fn from(value: AnswerOption) -> Self {
        value.0
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 1-based position of a question in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionOrdinal(pub u32);

impl QuestionOrdinal {
    pub const FIRST: QuestionOrdinal = QuestionOrdinal(1);

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for QuestionOrdinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_index_is_one_based() {
        assert_eq!(LearningStyle::from_wire_index(0), None);
        assert_eq!(
            LearningStyle::from_wire_index(1),
            Some(LearningStyle::Visual)
        );
        assert_eq!(
            LearningStyle::from_wire_index(4),
            Some(LearningStyle::Kinesthetic)
        );
        assert_eq!(LearningStyle::from_wire_index(5), None);
    }

    #[test]
    fn positions_match_fixed_order() {
        for (position, style) in LearningStyle::ALL.iter().enumerate() {
            assert_eq!(style.position(), position);
        }
        assert_eq!(LearningStyle::ReadingWriting.name(), "Reading/Writing");
    }

    #[test]
    fn answer_option_rejects_out_of_range_values() {
        assert!(AnswerOption::new(0).is_none());
        assert!(AnswerOption::new(5).is_none());
        assert_eq!(AnswerOption::new(3).map(AnswerOption::get), Some(3));
        assert!(serde_json::from_str::<AnswerOption>("7").is_err());
        assert_eq!(
            serde_json::from_str::<AnswerOption>("2").expect("option"),
            AnswerOption::new(2).expect("two")
        );
    }
}

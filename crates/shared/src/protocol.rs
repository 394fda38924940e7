use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::domain::{AnswerOption, Category};

pub const LEARNING_STYLE_ANSWER_PATH: &str = "/api/quiz/answer/learning-style";
pub const WELLBEING_ANSWER_PATH: &str = "/api/quiz/answer/wellbeing";
pub const RESULTS_SUMMARY_PATH: &str = "/api/quiz/results/summary";
pub const RECOMMENDATION_PATH: &str = "/api/quiz/recommendation";

pub fn answer_path(category: Category) -> &'static str {
    match category {
        Category::LearningStyle => LEARNING_STYLE_ANSWER_PATH,
        Category::Wellbeing => WELLBEING_ANSWER_PATH,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub option: AnswerOption,
}

/// Body of the results summary endpoint.
///
/// `learning_style` is `[dominant_index, visual, auditory, reading_writing, kinesthetic]`
/// with a 1-based dominant index; it is validated by the client, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSummary {
    pub learning_style: Vec<f64>,
    pub wellbeing_results: WellbeingResults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellbeingScore {
    #[serde(rename = "Score")]
    pub score: f64,
    #[serde(rename = "Recommendation")]
    pub recommendation: String,
}

/// Wellbeing categories in document order; the order is the display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WellbeingResults(pub Vec<(String, WellbeingScore)>);

impl Serialize for WellbeingResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, score) in &self.0 {
            map.serialize_entry(category, score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WellbeingResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedEntries;

        impl<'de> Visitor<'de> for OrderedEntries {
            type Value = WellbeingResults;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of wellbeing category to score")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((category, score)) = access.next_entry::<String, WellbeingScore>()? {
                    entries.push((category, score));
                }
                Ok(WellbeingResults(entries))
            }
        }

        deserializer.deserialize_map(OrderedEntries)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    pub interest_area: String,
    pub learning_style: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(rename = "Recommendation")]
    pub recommendation: String,
}

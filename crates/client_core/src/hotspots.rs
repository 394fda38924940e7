//! Hit areas of the four answer options, in percent of the question image.
//! Every question screen shares the same layout.

use shared::domain::AnswerOption;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hotspot {
    pub option: AnswerOption,
    pub top_pct: f32,
    pub left_pct: f32,
    pub width_pct: f32,
    pub height_pct: f32,
}

impl Hotspot {
    pub fn contains(&self, x_pct: f32, y_pct: f32) -> bool {
        x_pct >= self.left_pct
            && x_pct < self.left_pct + self.width_pct
            && y_pct >= self.top_pct
            && y_pct < self.top_pct + self.height_pct
    }
}

const FIRST_TOP_PCT: f32 = 37.0;
const ROW_STEP_PCT: f32 = 6.0;

pub fn layout() -> Vec<Hotspot> {
    AnswerOption::all()
        .map(|option| Hotspot {
            option,
            top_pct: FIRST_TOP_PCT + ROW_STEP_PCT * f32::from(option.get() - 1),
            left_pct: 10.0,
            width_pct: 80.0,
            height_pct: 10.0,
        })
        .collect()
}

/// Resolves a click to an option. Rows overlap and share one stacking
/// level, so the later option is on top and takes the click.
pub fn hit_test(x_pct: f32, y_pct: f32) -> Option<AnswerOption> {
    layout()
        .into_iter()
        .rev()
        .find(|hotspot| hotspot.contains(x_pct, y_pct))
        .map(|hotspot| hotspot.option)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_rows_stacked_from_thirty_seven_percent() {
        let tops: Vec<f32> = layout().iter().map(|hotspot| hotspot.top_pct).collect();
        assert_eq!(tops, vec![37.0, 43.0, 49.0, 55.0]);
    }

    #[test]
    fn hit_test_resolves_clicks_inside_rows() {
        assert_eq!(hit_test(50.0, 38.0).map(AnswerOption::get), Some(1));
        assert_eq!(hit_test(50.0, 48.0).map(AnswerOption::get), Some(2));
        assert_eq!(hit_test(50.0, 64.0).map(AnswerOption::get), Some(4));
    }

    #[test]
    fn overlapping_rows_resolve_to_the_later_option() {
        assert_eq!(hit_test(50.0, 45.0).map(AnswerOption::get), Some(2));
        assert_eq!(hit_test(50.0, 50.0).map(AnswerOption::get), Some(3));
        assert_eq!(hit_test(50.0, 56.0).map(AnswerOption::get), Some(4));
        assert_eq!(hit_test(50.0, 43.0).map(AnswerOption::get), Some(2));
        assert_eq!(hit_test(50.0, 42.9).map(AnswerOption::get), Some(1));
    }

    #[test]
    fn clicks_outside_every_row_miss() {
        assert_eq!(hit_test(50.0, 10.0), None);
        assert_eq!(hit_test(5.0, 40.0), None);
        assert_eq!(hit_test(50.0, 65.0), None);
    }
}

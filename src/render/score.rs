//! Quality score gauge, grade and category bars.

use std::f64::consts::PI;
use std::sync::Arc;

use strum::IntoEnumIterator;

use super::animation::{AnimationHandle, Animations};
use crate::models::review::{Category, Grade, QualityScores, ScoreMetrics};
use crate::view::{Region, Tone, View};

/// Colour for a letter grade. The single source of truth for grade colouring.
pub fn grade_tone(grade: Grade) -> Tone {
    match grade {
        Grade::A => Tone::Emerald,
        Grade::B => Tone::Blue,
        Grade::C => Tone::Amber,
        Grade::D => Tone::Orange,
        Grade::F => Tone::Red,
        Grade::Unknown => Tone::Gray,
    }
}

/// Fill colour for a category bar. Bands are inclusive on their lower bound.
pub fn bar_tone(score: u8) -> Tone {
    match score {
        90.. => Tone::Emerald,
        70..=89 => Tone::Blue,
        50..=69 => Tone::Amber,
        _ => Tone::Red,
    }
}

pub fn circumference(radius: f64) -> f64 {
    2.0 * PI * radius
}

/// Stroke offset that fills `overall`% of the gauge arc.
///
/// `offset(0) == circumference` (empty) and `offset(100) == 0` (full).
pub fn gauge_offset(overall: u8, circumference: f64) -> f64 {
    let fraction = f64::from(overall.min(100)) / 100.0;
    circumference - fraction * circumference
}

pub fn metrics_line(metrics: &ScoreMetrics) -> String {
    format!(
        "{} lines · complexity {} · {} issue(s)",
        metrics.loc, metrics.complexity, metrics.issues_count
    )
}

/// Render a full score card.
///
/// Static values (gauge offset, colours, grade letter) are applied before
/// returning; the returned handles belong to the cosmetic count-up and
/// bar-fill tasks.
pub fn render_scores(
    view: &Arc<dyn View>,
    scores: &QualityScores,
    animations: &Animations,
) -> Vec<AnimationHandle> {
    let mut handles = Vec::new();

    let tone = grade_tone(scores.grade);
    let c = circumference(view.gauge_radius());
    view.set_stroke_offset(Region::Gauge, gauge_offset(scores.overall, c));
    view.set_tone(Region::Gauge, tone);
    view.set_text(Region::Grade, &scores.grade.to_string());
    view.set_tone(Region::Grade, tone);
    handles.push(animations.count_up(view, Region::OverallScore, u32::from(scores.overall)));

    for category in Category::iter() {
        let score = scores.categories.get(category);
        view.set_tone(Region::CategoryBar(category), bar_tone(score));
        handles.push(animations.fill_bar(view, Region::CategoryBar(category), score));
        handles.push(animations.count_up(
            view,
            Region::CategoryScore(category),
            u32::from(score),
        ));
    }

    match scores.metrics {
        Some(ref metrics) => {
            view.set_text(Region::ScoreMetrics, &metrics_line(metrics));
            view.set_visible(Region::ScoreMetrics, true);
        }
        None => view.set_visible(Region::ScoreMetrics, false),
    }

    handles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::review::CategoryScores;
    use crate::view::Screen;

    #[test]
    fn grade_mapping_is_total() {
        let expected = [
            (Grade::A, Tone::Emerald),
            (Grade::B, Tone::Blue),
            (Grade::C, Tone::Amber),
            (Grade::D, Tone::Orange),
            (Grade::F, Tone::Red),
            (Grade::Unknown, Tone::Gray),
        ];
        for (grade, tone) in expected {
            assert_eq!(grade_tone(grade), tone);
        }
        assert_eq!(Grade::iter().count(), expected.len());
    }

    #[test]
    fn bar_bands_at_boundaries() {
        assert_eq!(bar_tone(100), Tone::Emerald);
        assert_eq!(bar_tone(90), Tone::Emerald);
        assert_eq!(bar_tone(89), Tone::Blue);
        assert_eq!(bar_tone(70), Tone::Blue);
        assert_eq!(bar_tone(69), Tone::Amber);
        assert_eq!(bar_tone(50), Tone::Amber);
        assert_eq!(bar_tone(49), Tone::Red);
        assert_eq!(bar_tone(0), Tone::Red);
    }

    #[test]
    fn gauge_offset_endpoints_and_monotonicity() {
        let c = circumference(54.0);
        assert!((c - 2.0 * PI * 54.0).abs() < 1e-9);
        assert!((gauge_offset(0, c) - c).abs() < 1e-9);
        assert!(gauge_offset(100, c).abs() < 1e-9);
        let mut previous = gauge_offset(0, c);
        for score in 1..=100u8 {
            let offset = gauge_offset(score, c);
            assert!(offset < previous, "offset must shrink at {score}");
            previous = offset;
        }
    }

    #[test]
    fn render_scores_applies_final_values_immediately() {
        let screen = Arc::new(Screen::with_gauge_radius(40.0));
        let view: Arc<dyn View> = screen.clone();
        let scores = QualityScores {
            overall: 75,
            grade: Grade::C,
            categories: CategoryScores {
                security: 90,
                performance: 69,
                maintainability: 70,
                readability: 10,
            },
            metrics: Some(ScoreMetrics {
                loc: 120,
                complexity: 7,
                issues_count: 4,
            }),
        };

        let handles = render_scores(&view, &scores, &Animations::immediate());
        assert!(handles.iter().all(AnimationHandle::is_finished));

        let snap = screen.snapshot();
        let c = circumference(40.0);
        assert!((snap.stroke_offset[&Region::Gauge] - 0.25 * c).abs() < 1e-9);
        assert_eq!(snap.tone[&Region::Gauge], Tone::Amber);
        assert_eq!(snap.text[&Region::Grade], "C");
        assert_eq!(snap.text[&Region::OverallScore], "75");
        assert_eq!(snap.width[&Region::CategoryBar(Category::Security)], 90);
        assert_eq!(snap.tone[&Region::CategoryBar(Category::Security)], Tone::Emerald);
        assert_eq!(snap.tone[&Region::CategoryBar(Category::Performance)], Tone::Amber);
        assert_eq!(snap.tone[&Region::CategoryBar(Category::Maintainability)], Tone::Blue);
        assert_eq!(snap.tone[&Region::CategoryBar(Category::Readability)], Tone::Red);
        assert_eq!(snap.text[&Region::CategoryScore(Category::Readability)], "10");
        assert!(snap.text[&Region::ScoreMetrics].contains("120 lines"));
        assert_eq!(snap.visible.get(&Region::ScoreMetrics), Some(&true));
    }
}

//! Review request and result types.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{EnumIter, IntoStaticStr};

/// Letter grade assigned by the backend scorer.
///
/// The client never derives a grade from the numeric score; it only
/// displays what the backend sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, EnumIter)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
    /// Missing or unrecognised grade.
    #[default]
    Unknown,
}

/// Accepts any casing and treats unrecognised values, including non-strings,
/// as [`Grade::Unknown`] instead of failing the whole payload.
impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let letter = value.as_str().unwrap_or_default().trim().to_uppercase();
        Ok(match letter.as_str() {
            "A" => Grade::A,
            "B" => Grade::B,
            "C" => Grade::C,
            "D" => Grade::D,
            "F" => Grade::F,
            _ => Grade::Unknown,
        })
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
            Grade::Unknown => write!(f, "?"),
        }
    }
}

/// Finding severity buckets, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// Quality score categories shown as bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Security,
    Performance,
    Maintainability,
    Readability,
}

/// Request body for `POST /review`.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRequest {
    pub code: String,
    pub language: String,
    pub focus_areas: Vec<String>,
    pub calculate_score: bool,
}

/// One reported issue. The backend sends either a bare string or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Finding(pub serde_json::Value);

impl Finding {
    /// Best-effort one-line description.
    pub fn text(&self) -> String {
        match &self.0 {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Object(map) => ["title", "message", "description", "issue"]
                .iter()
                .find_map(|k| map.get(*k).and_then(|v| v.as_str()))
                .map(str::to_string)
                .unwrap_or_else(|| self.0.to_string()),
            other => other.to_string(),
        }
    }
}

/// Per-category scores in `[0, 100]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryScores {
    #[serde(deserialize_with = "percent")]
    pub security: u8,
    #[serde(deserialize_with = "percent")]
    pub performance: u8,
    #[serde(deserialize_with = "percent")]
    pub maintainability: u8,
    #[serde(deserialize_with = "percent")]
    pub readability: u8,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> u8 {
        match category {
            Category::Security => self.security,
            Category::Performance => self.performance,
            Category::Maintainability => self.maintainability,
            Category::Readability => self.readability,
        }
    }
}

/// Size and complexity figures reported alongside the scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreMetrics {
    pub loc: u64,
    pub complexity: u64,
    pub issues_count: u64,
}

/// Backend-computed quality scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityScores {
    #[serde(deserialize_with = "percent")]
    pub overall: u8,
    pub grade: Grade,
    pub categories: CategoryScores,
    pub metrics: Option<ScoreMetrics>,
}

/// Fallback per-severity counts some backend versions send instead of lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }
}

/// Response body of `POST /review`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewResult {
    pub quality_scores: Option<QualityScores>,
    pub critical: Option<Vec<Finding>>,
    pub high: Option<Vec<Finding>>,
    pub medium: Option<Vec<Finding>>,
    pub low: Option<Vec<Finding>>,
    pub counts: Option<SeverityCounts>,
    pub summary: Option<String>,
    #[serde(alias = "review")]
    pub raw_review: Option<String>,
}

impl ReviewResult {
    /// Findings listed under `severity`, if the list was sent.
    pub fn findings(&self, severity: Severity) -> Option<&[Finding]> {
        match severity {
            Severity::Critical => self.critical.as_deref(),
            Severity::High => self.high.as_deref(),
            Severity::Medium => self.medium.as_deref(),
            Severity::Low => self.low.as_deref(),
        }
    }

    /// Displayed count for `severity`.
    ///
    /// The list length wins; otherwise the `counts` map; otherwise zero.
    pub fn count(&self, severity: Severity) -> usize {
        match self.findings(severity) {
            Some(list) => list.len(),
            None => self.counts.map(|c| c.get(severity)).unwrap_or(0),
        }
    }
}

/// Deserialize any JSON number (or null) into a clamped, rounded percentage.
fn percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if value.is_nan() {
        return Ok(0);
    }
    Ok(value.round().clamp(0.0, 100.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_accepts_any_case_and_unknowns() {
        let parse = |s: &str| serde_json::from_str::<Grade>(s).unwrap();
        assert_eq!(parse("\"A\""), Grade::A);
        assert_eq!(parse("\"f\""), Grade::F);
        assert_eq!(parse("\"A+\""), Grade::Unknown);
        assert_eq!(parse("null"), Grade::Unknown);
        assert_eq!(parse("3"), Grade::Unknown);
        assert_eq!(parse(r#"{"letter": "A"}"#), Grade::Unknown);
    }

    #[test]
    fn numeric_grade_keeps_the_rest_of_the_review() {
        let review: ReviewResult = serde_json::from_str(
            r#"{"quality_scores": {"overall": 80, "grade": 3}, "summary": "ok"}"#,
        )
        .unwrap();
        let scores = review.quality_scores.unwrap();
        assert_eq!(scores.grade, Grade::Unknown);
        assert_eq!(scores.overall, 80);
        assert_eq!(review.summary.as_deref(), Some("ok"));
    }

    #[test]
    fn scores_are_rounded_and_clamped() {
        let scores: QualityScores = serde_json::from_str(
            r#"{"overall": 87.6, "grade": "B",
                "categories": {"security": 120, "performance": -3, "maintainability": 70.4}}"#,
        )
        .unwrap();
        assert_eq!(scores.overall, 88);
        assert_eq!(scores.categories.security, 100);
        assert_eq!(scores.categories.performance, 0);
        assert_eq!(scores.categories.maintainability, 70);
        assert_eq!(scores.categories.readability, 0);
        assert!(scores.metrics.is_none());
    }

    #[test]
    fn counts_default_to_zero_when_lists_absent() {
        let result: ReviewResult =
            serde_json::from_str(r#"{"critical": ["sql injection"], "summary": "ok"}"#).unwrap();
        assert_eq!(result.count(Severity::Critical), 1);
        assert_eq!(result.count(Severity::High), 0);
        assert_eq!(result.count(Severity::Low), 0);
    }

    #[test]
    fn counts_map_fills_in_missing_lists() {
        let result: ReviewResult = serde_json::from_str(
            r#"{"review": "text", "counts": {"critical": 0, "high": 2, "medium": 5, "low": 1},
                "high": []}"#,
        )
        .unwrap();
        assert_eq!(result.raw_review.as_deref(), Some("text"));
        // An explicit list beats the counts map
        assert_eq!(result.count(Severity::High), 0);
        assert_eq!(result.count(Severity::Medium), 5);
    }

    #[test]
    fn finding_text_handles_strings_and_objects() {
        let s = Finding(serde_json::json!("plain"));
        let o = Finding(serde_json::json!({"title": "Unbounded loop", "line": 3}));
        let n = Finding(serde_json::json!(42));
        assert_eq!(s.text(), "plain");
        assert_eq!(o.text(), "Unbounded loop");
        assert_eq!(n.text(), "42");
    }

    #[test]
    fn request_serializes_score_flag() {
        let req = ReviewRequest {
            code: "x = 1".into(),
            language: "python".into(),
            focus_areas: vec!["bugs".into()],
            calculate_score: true,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["calculate_score"], true);
        assert_eq!(json["focus_areas"][0], "bugs");
    }
}

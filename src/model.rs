//! Analysis document schema.
//!
//! Every field the upstream extraction may omit is optional here, and every
//! numeric field goes through a lenient decoder so that a stray string or
//! `null` becomes `None` rather than a parse failure. Nothing in the render
//! pipeline mutates these values.

use crate::error::{ReportError, Result};
use serde::{Deserialize, Deserializer};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unknown,
}

impl From<Option<String>> for Gender {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "male" || v == "m" || v == "男" => Gender::Male,
            Some(v) if v == "female" || v == "f" || v == "女" => Gender::Female,
            _ => Gender::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for Gender {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Option::<NumberOrString>::deserialize(deserializer)?
            .and_then(NumberOrString::into_text)
            .into())
    }
}

impl Gender {
    /// Single-letter glyph drawn inside graph nodes and avatars.
    pub fn glyph(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unknown => "?",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Unknown => "other",
        }
    }
}

/// Sensitive-flag severity. Free-form input is normalized; anything
/// unrecognized sorts last as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    High,
    Medium,
    Low,
    #[default]
    Other,
}

impl Severity {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "high" | "高" | "severe" | "critical" => Severity::High,
            "medium" | "mid" | "中" | "moderate" => Severity::Medium,
            "low" | "低" | "minor" | "mild" => Severity::Low,
            _ => Severity::Other,
        }
    }

    /// Sort key: high < medium < low < other.
    pub fn rank(self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
            Severity::Other => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Other => "Unrated",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Other => "other",
        }
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<NumberOrString>::deserialize(deserializer)?.and_then(NumberOrString::into_text);
        Ok(raw.as_deref().map(Severity::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub sexual_preferences: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub lewdness_score: Option<f64>,
    #[serde(default)]
    pub lewdness_analysis: Option<String>,
}

impl Character {
    /// Score usable for ranking: finite and positive.
    pub fn score(&self) -> Option<f64> {
        self.lewdness_score.filter(|s| s.is_finite() && *s > 0.0)
    }

    /// Sort key for the female roster. Any finite score, zero included,
    /// orders ahead of a missing one.
    pub fn sort_score(&self) -> f64 {
        self.lewdness_score.filter(|s| s.is_finite()).unwrap_or(-1.0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub start_way: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntimacyScene {
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub chapter: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl IntimacyScene {
    pub fn participants_joined(&self, sep: &str) -> String {
        if self.participants.is_empty() {
            return "?".to_string();
        }
        self.participants.join(sep)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneTally {
    #[serde(default, deserialize_with = "lenient_number")]
    pub total_count: Option<f64>,
    #[serde(default)]
    pub scenes: Option<Vec<IntimacyScene>>,
}

impl SceneTally {
    pub fn scenes(&self) -> &[IntimacyScene] {
        self.scenes.as_deref().unwrap_or_default()
    }

    /// The declared total; 0 when absent or not a number. The scene list may
    /// be shorter or longer and does not change it.
    pub fn total(&self) -> usize {
        self.total_count.map(count_from_f64).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvolutionPoint {
    #[serde(default, deserialize_with = "lenient_text")]
    pub chapter: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensitiveFlag {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub involved_characters: Vec<String>,
    #[serde(default, alias = "location", deserialize_with = "lenient_text")]
    pub chapter_location: Option<String>,
    #[serde(default)]
    pub relationship_context: Option<String>,
}

/// A recurring erotic element of the work (a kink or motif) with one example.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LewdElement {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub involved_characters: Vec<String>,
    #[serde(default, alias = "location", deserialize_with = "lenient_text")]
    pub chapter_location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NovelInfo {
    #[serde(default)]
    pub world_setting: Option<String>,
    #[serde(default)]
    pub world_tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub chapter_count: Option<f64>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub completion_note: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub word_count: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisDocument {
    #[serde(default)]
    pub novel_info: Option<NovelInfo>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub characters: Option<Vec<Character>>,
    #[serde(default)]
    pub relationships: Option<Vec<Relationship>>,
    #[serde(default, rename = "first_sex_scenes", alias = "first_intimacy_scenes")]
    pub first_intimacy: Option<Vec<IntimacyScene>>,
    #[serde(default, rename = "sex_scenes", alias = "intimacy_scenes")]
    pub intimacy: Option<SceneTally>,
    #[serde(default)]
    pub evolution: Option<Vec<EvolutionPoint>>,
    #[serde(default, rename = "thunderzones", alias = "sensitive_flags")]
    pub sensitive_flags: Option<Vec<SensitiveFlag>>,
    #[serde(default, rename = "thunderzone_summary", alias = "sensitive_summary")]
    pub sensitive_summary: Option<String>,
    #[serde(default)]
    pub lewd_elements: Option<Vec<LewdElement>>,
    #[serde(default)]
    pub lewd_elements_summary: Option<String>,
}

impl AnalysisDocument {
    /// Parses a document from JSON, falling back to JSON5. A backend response
    /// of the form `{"analysis": {...}}` is unwrapped.
    pub fn from_json(input: &str) -> Result<Self> {
        let value: serde_json::Value = match serde_json::from_str(input) {
            Ok(value) => value,
            Err(json_err) => match json5::from_str::<serde_json::Value>(input) {
                Ok(value) => {
                    warn!(error = %json_err, "input is not strict JSON, parsed as JSON5");
                    value
                }
                Err(err) => return Err(ReportError::Parse(err.to_string())),
            },
        };
        Self::from_value(value)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let value = match value {
            serde_json::Value::Object(mut map)
                if map.contains_key("analysis") && !map.contains_key("characters") =>
            {
                map.remove("analysis").unwrap_or_default()
            }
            other => other,
        };
        if !value.is_object() {
            return Err(ReportError::NotAnObject(json_kind(&value)));
        }
        serde_json::from_value(value).map_err(|err| ReportError::Parse(err.to_string()))
    }

    pub fn characters(&self) -> &[Character] {
        self.characters.as_deref().unwrap_or_default()
    }

    pub fn relationships(&self) -> &[Relationship] {
        self.relationships.as_deref().unwrap_or_default()
    }

    pub fn evolution(&self) -> &[EvolutionPoint] {
        self.evolution.as_deref().unwrap_or_default()
    }

    pub fn sensitive_flags(&self) -> &[SensitiveFlag] {
        self.sensitive_flags.as_deref().unwrap_or_default()
    }

    pub fn lewd_elements(&self) -> &[LewdElement] {
        self.lewd_elements.as_deref().unwrap_or_default()
    }

    pub fn first_intimacy(&self) -> &[IntimacyScene] {
        self.first_intimacy.as_deref().unwrap_or_default()
    }

    /// Intimacy total used by quick stats and the count section.
    pub fn intimacy_total(&self) -> usize {
        self.intimacy.as_ref().map(SceneTally::total).unwrap_or(0)
    }

    pub fn word_count(&self) -> Option<u64> {
        self.novel_info
            .as_ref()
            .and_then(|info| info.word_count)
            .map(|n| count_from_f64(n) as u64)
    }
}

/// Clamps a decoded number to a non-negative count.
pub fn count_from_f64(value: f64) -> usize {
    if value.is_finite() && value > 0.0 {
        value as usize
    } else {
        0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
    Other(serde::de::IgnoredAny),
}

impl NumberOrString {
    fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Number(val) => Some(*val).filter(|v| v.is_finite()),
            NumberOrString::String(val) => val.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            NumberOrString::Other(_) => None,
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            NumberOrString::Number(val) => Some(format!("{val}")),
            NumberOrString::String(val) => Some(val),
            NumberOrString::Other(_) => None,
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()))
}

fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(value.and_then(NumberOrString::into_text))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_document() {
        let doc = AnalysisDocument::from_json("{}").unwrap();
        assert!(doc.characters().is_empty());
        assert!(doc.characters.is_none());
        assert_eq!(doc.intimacy_total(), 0);
    }

    #[test]
    fn unwraps_backend_response() {
        let doc = AnalysisDocument::from_json(r#"{"analysis": {"characters": [{"name": "A"}]}}"#)
            .unwrap();
        assert_eq!(doc.characters().len(), 1);
    }

    #[test]
    fn lenient_numbers_never_fail() {
        let doc = AnalysisDocument::from_json(
            r#"{"characters": [
                {"name": "A", "gender": "female", "lewdness_score": "85"},
                {"name": "B", "gender": "female", "lewdness_score": "n/a"},
                {"name": "C", "gender": null, "lewdness_score": [1]}
            ],
            "sex_scenes": {"total_count": "three", "scenes": [{"chapter": 3}]}}"#,
        )
        .unwrap();
        let chars = doc.characters();
        assert_eq!(chars[0].lewdness_score, Some(85.0));
        assert_eq!(chars[1].lewdness_score, None);
        assert_eq!(chars[2].gender, Gender::Unknown);
        assert_eq!(chars[2].lewdness_score, None);
        let tally = doc.intimacy.as_ref().unwrap();
        assert_eq!(tally.total(), 0);
        assert_eq!(tally.scenes()[0].chapter.as_deref(), Some("3"));
    }

    #[test]
    fn accepts_json5_input() {
        let doc = AnalysisDocument::from_json("{characters: [{name: 'A', gender: 'male'},],}").unwrap();
        assert_eq!(doc.characters()[0].gender, Gender::Male);
    }

    #[test]
    fn rejects_non_object_input() {
        let err = AnalysisDocument::from_json("[1, 2]").unwrap_err();
        assert!(matches!(err, ReportError::NotAnObject("an array")));
    }

    #[test]
    fn normalizes_severity() {
        assert_eq!(Severity::parse("高"), Severity::High);
        assert_eq!(Severity::parse(" HIGH "), Severity::High);
        assert_eq!(Severity::parse("中"), Severity::Medium);
        assert_eq!(Severity::parse("low"), Severity::Low);
        assert_eq!(Severity::parse("spicy"), Severity::Other);
        assert!(Severity::High.rank() < Severity::Medium.rank());
        assert!(Severity::Low.rank() < Severity::Other.rank());
    }

    #[test]
    fn declared_total_wins_over_listed_scenes() {
        let tally = SceneTally {
            total_count: Some(20.0),
            scenes: Some(vec![IntimacyScene::default(); 3]),
        };
        assert_eq!(tally.total(), 20);
    }

    #[test]
    fn absent_total_counts_as_zero() {
        let tally = SceneTally {
            total_count: None,
            scenes: Some(vec![IntimacyScene::default(); 20]),
        };
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn declared_total_below_listed_scenes_is_kept() {
        let tally = SceneTally {
            total_count: Some(3.0),
            scenes: Some(vec![IntimacyScene::default(); 20]),
        };
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn zero_score_sorts_ahead_of_missing_but_is_unranked() {
        let zero = Character {
            lewdness_score: Some(0.0),
            ..Default::default()
        };
        let missing = Character::default();
        assert!(zero.sort_score() > missing.sort_score());
        assert_eq!(zero.score(), None);
    }

    #[test]
    fn parses_lewd_elements() {
        let doc = AnalysisDocument::from_json(
            r#"{"lewd_elements": [{"type": "feet", "example": "ex", "involved_characters": ["A"], "chapter_location": 4}],
                "lewd_elements_summary": "one motif"}"#,
        )
        .unwrap();
        let elements = doc.lewd_elements();
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].kind.as_deref(), Some("feet"));
        assert_eq!(elements[0].chapter_location.as_deref(), Some("4"));
        assert_eq!(doc.lewd_elements_summary.as_deref(), Some("one motif"));
    }
}

use crate::markup::{Element, Markup};
use crate::model::{AnalysisDocument, SensitiveFlag, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

use super::empty_state;

/// Normalized flag type, used only to choose an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagCategory {
    Infidelity,
    Death,
    Violence,
    Betrayal,
    Other,
}

static INFIDELITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bntr\b|cuckold|infidel|cheat|affair|绿帽|出轨|偷情").expect("valid regex"));
static DEATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)death|\bdies\b|killed|死|亡").expect("valid regex"));
static VIOLENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)violen|abuse|rape|torture|暴力|虐|强迫").expect("valid regex"));
static BETRAYAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)betray|背叛|背刺").expect("valid regex"));

impl FlagCategory {
    pub fn classify(kind: Option<&str>) -> Self {
        let Some(kind) = kind else {
            return FlagCategory::Other;
        };
        if INFIDELITY_RE.is_match(kind) {
            FlagCategory::Infidelity
        } else if DEATH_RE.is_match(kind) {
            FlagCategory::Death
        } else if VIOLENCE_RE.is_match(kind) {
            FlagCategory::Violence
        } else if BETRAYAL_RE.is_match(kind) {
            FlagCategory::Betrayal
        } else {
            FlagCategory::Other
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FlagCategory::Infidelity => "💔",
            FlagCategory::Death => "💀",
            FlagCategory::Violence => "🩸",
            FlagCategory::Betrayal => "🗡️",
            FlagCategory::Other => "⚠️",
        }
    }
}

fn severity_badge(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "badge badge-error",
        Severity::Medium => "badge badge-warning",
        Severity::Low => "badge badge-info",
        Severity::Other => "badge badge-ghost",
    }
}

/// Stable sort by severity rank; equal severities keep document order.
pub fn sort_flags(flags: &[SensitiveFlag]) -> Vec<&SensitiveFlag> {
    let mut sorted: Vec<&SensitiveFlag> = flags.iter().collect();
    sorted.sort_by_key(|flag| flag.severity.rank());
    sorted
}

fn flag_card(flag: &SensitiveFlag) -> Element {
    let category = FlagCategory::classify(flag.kind.as_deref());
    let mut card = Element::new("div")
        .class(format!("thunderzone-card thunderzone-{}", flag.severity.slug()))
        .child(
            Element::new("div")
                .class("thunderzone-header")
                .child(Element::new("span").class("thunderzone-icon").raw(category.icon()))
                .child(
                    Element::new("span")
                        .class("thunderzone-type")
                        .text(flag.kind.clone().unwrap_or_default()),
                )
                .child(
                    Element::new("span")
                        .class(severity_badge(flag.severity))
                        .raw(flag.severity.label()),
                ),
        )
        .child(
            Element::new("div")
                .class("thunderzone-desc")
                .text(flag.description.clone().unwrap_or_default()),
        );

    if !flag.involved_characters.is_empty() {
        card = card.child(
            Element::new("div").class("thunderzone-chars").children(
                flag.involved_characters
                    .iter()
                    .map(|name| Element::new("span").class("char-name-tag").text(name.clone())),
            ),
        );
    }
    if let Some(location) = flag.chapter_location.as_deref().filter(|l| !l.trim().is_empty()) {
        card = card.child(Element::new("div").class("thunderzone-location").text(location));
    }
    if let Some(context) = flag.relationship_context.as_deref().filter(|c| !c.trim().is_empty()) {
        card = card.child(Element::new("div").class("thunderzone-context").text(context));
    }
    card
}

/// Sensitive-content cards, most severe first, preceded by the overall
/// summary when one was provided.
pub fn build_sensitive_flags(doc: &AnalysisDocument) -> Markup {
    let flags = doc.sensitive_flags();
    if flags.is_empty() {
        return empty_state("✅", "No sensitive content detected");
    }

    let mut parts: Vec<Markup> = Vec::new();
    if let Some(summary) = doc.sensitive_summary.as_deref().filter(|s| !s.trim().is_empty()) {
        parts.push(
            Element::new("div")
                .class("thunderzone-summary")
                .child(Element::new("div").class("summary-title").raw("Overview"))
                .child(Element::new("div").class("summary-content").text(summary))
                .into(),
        );
    }
    parts.push(
        Element::new("div")
            .class("thunderzone-list")
            .children(sort_flags(flags).into_iter().map(flag_card))
            .into(),
    );
    Markup::fragment(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_reports_nothing_detected() {
        let html = build_sensitive_flags(&AnalysisDocument::default()).render();
        assert!(html.contains("✅"));
        assert!(html.contains("No sensitive content detected"));
    }

    #[test]
    fn sorts_by_severity_keeping_order() {
        let doc = AnalysisDocument::from_json(
            r#"{"thunderzones": [
                {"type": "a", "severity": "低", "description": "lowdesc"},
                {"type": "b", "severity": "whatever", "description": "otherdesc"},
                {"type": "c", "severity": "高", "description": "highdesc"},
                {"type": "d", "severity": "中", "description": "middesc"},
                {"type": "e", "severity": "high", "description": "highdesc2"}
            ]}"#,
        )
        .unwrap();
        let html = build_sensitive_flags(&doc).render();
        let pos = |needle: &str| html.find(needle).unwrap();
        assert!(pos("highdesc") < pos("highdesc2"));
        assert!(pos("highdesc2") < pos("middesc"));
        assert!(pos("middesc") < pos("lowdesc"));
        assert!(pos("lowdesc") < pos("otherdesc"));
        assert!(html.contains("badge-error"));
        assert!(html.contains("badge-ghost"));
        assert!(html.contains("thunderzone-high"));
    }

    #[test]
    fn classifies_types() {
        assert_eq!(FlagCategory::classify(Some("NTR")), FlagCategory::Infidelity);
        assert_eq!(FlagCategory::classify(Some("女主死亡")), FlagCategory::Death);
        assert_eq!(FlagCategory::classify(Some("Violence")), FlagCategory::Violence);
        assert_eq!(FlagCategory::classify(Some("背叛")), FlagCategory::Betrayal);
        assert_eq!(FlagCategory::classify(Some("harem")), FlagCategory::Other);
        assert_eq!(FlagCategory::classify(None), FlagCategory::Other);
    }

    #[test]
    fn escapes_every_field() {
        let doc = AnalysisDocument::from_json(
            r#"{"thunderzones": [{
                "type": "<script>alert('xss')</script>",
                "severity": "高",
                "description": "<img src=x onerror=alert(1)>",
                "involved_characters": ["<a href=\"javascript:alert(2)\">x</a>"],
                "chapter_location": "<svg onload=alert(3)>",
                "relationship_context": "<script>alert(4)</script>"
            }],
            "thunderzone_summary": "<img src=x onerror=alert(5)>"}"#,
        )
        .unwrap();
        let html = build_sensitive_flags(&doc).render();
        for tag in ["<script", "<img", "<svg", "<a "] {
            assert!(!html.contains(tag), "unescaped {tag}");
        }
        assert!(html.contains("&lt;script"));
        assert!(html.contains("&lt;img"));
    }
}

use crate::markup::{Element, Markup};
use crate::model::{AnalysisDocument, Character, Gender, NovelInfo, count_from_f64};

use super::{empty_state, or_unknown};

fn has_content(doc: &AnalysisDocument) -> bool {
    doc.novel_info.is_some()
        || !doc.characters().is_empty()
        || doc.summary.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn novel_meta(info: &NovelInfo) -> Option<Element> {
    let world = info.world_setting.as_deref().filter(|w| !w.trim().is_empty())?;

    let chapters = match info.chapter_count {
        Some(n) => count_from_f64(n).to_string(),
        None => or_unknown(None),
    };
    let (status_class, status) = match info.is_completed {
        Some(true) => ("meta-value completed", "Completed".to_string()),
        Some(false) => ("meta-value ongoing", "Ongoing".to_string()),
        None => ("meta-value", or_unknown(None)),
    };
    let status = match info.completion_note.as_deref().filter(|n| !n.trim().is_empty()) {
        Some(note) => format!("{status} - {note}"),
        None => status,
    };

    let item = |label: &'static str, class: &'static str, value: String| {
        Element::new("div")
            .class("novel-meta-item")
            .child(Element::new("span").class("meta-label").raw(label))
            .child(Element::new("span").class(class).text(value))
    };

    let mut grid = Element::new("div")
        .class("novel-meta-grid")
        .child(item("World", "meta-value", world.to_string()))
        .child(item("Chapters", "meta-value", chapters))
        .child(item("Status", status_class, status));
    if !info.world_tags.is_empty() {
        grid = grid.child(
            Element::new("div").class("novel-meta-item").child(
                Element::new("span")
                    .class("meta-tags")
                    .children(info.world_tags.iter().map(|tag| {
                        Element::new("span").class("world-tag").text(tag.clone())
                    })),
            ),
        );
    }

    Some(
        Element::new("div")
            .class("novel-meta-section")
            .child(Element::new("div").class("summary-title").raw("Novel"))
            .child(grid),
    )
}

fn name_group(label: &'static str, gender: Gender, members: &[&Character]) -> Element {
    let class = gender.css_class();
    Element::new("div")
        .class(format!("char-names-group {class}"))
        .child(
            Element::new("div")
                .class("char-group-label")
                .text(format!("{label} ({})", members.len())),
        )
        .child(
            Element::new("div").class("char-names-list").children(members.iter().map(|c| {
                Element::new("span")
                    .class(format!("char-name-tag {class}"))
                    .text(c.name.clone())
            })),
        )
}

/// Novel metadata, roster grouped by gender, and the free-text plot summary.
pub fn build_summary(doc: &AnalysisDocument) -> Markup {
    if !has_content(doc) {
        return empty_state("📖", "No data");
    }

    let chars = doc.characters();
    let males: Vec<&Character> = chars.iter().filter(|c| c.gender == Gender::Male).collect();
    let females: Vec<&Character> = chars.iter().filter(|c| c.gender == Gender::Female).collect();
    let others: Vec<&Character> = chars.iter().filter(|c| c.gender == Gender::Unknown).collect();

    let mut roster = Element::new("div")
        .class("char-names-grid")
        .child(name_group("Male characters", Gender::Male, &males))
        .child(name_group("Female characters", Gender::Female, &females));
    if !others.is_empty() {
        roster = roster.child(name_group("Other characters", Gender::Unknown, &others));
    }

    let summary_text = doc
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("No summary yet");

    let mut parts: Vec<Markup> = Vec::new();
    if let Some(meta) = doc.novel_info.as_ref().and_then(novel_meta) {
        parts.push(meta.into());
    }
    parts.push(
        Element::new("div")
            .class("char-names-section")
            .child(Element::new("div").class("summary-title").raw("Cast"))
            .child(roster)
            .into(),
    );
    parts.push(
        Element::new("div")
            .class("summary-section")
            .child(Element::new("div").class("summary-title").raw("Plot summary"))
            .child(Element::new("div").class("summary-content").text(summary_text))
            .into(),
    );
    Markup::fragment(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_renders_empty_state() {
        let html = build_summary(&AnalysisDocument::default()).render();
        assert!(html.contains("empty-state"));
    }

    #[test]
    fn groups_roster_and_escapes_summary() {
        let doc = AnalysisDocument::from_json(
            r#"{
                "novel_info": {"world_setting": "Wuxia", "chapter_count": 120, "is_completed": false, "completion_note": "hiatus"},
                "summary": "A <b>tale</b>",
                "characters": [
                    {"name": "Lin", "gender": "male"},
                    {"name": "Mei", "gender": "female"},
                    {"name": "Fox", "gender": "spirit"}
                ]
            }"#,
        )
        .unwrap();
        let html = build_summary(&doc).render();
        assert!(html.contains("Male characters (1)"));
        assert!(html.contains("Female characters (1)"));
        assert!(html.contains("Other characters (1)"));
        assert!(html.contains("Ongoing - hiatus"));
        assert!(html.contains(">120<"));
        assert!(html.contains("A &lt;b&gt;tale&lt;/b&gt;"));
    }

    #[test]
    fn metadata_without_world_setting_is_skipped() {
        let doc = AnalysisDocument::from_json(r#"{"novel_info": {"chapter_count": 3}, "summary": "x"}"#).unwrap();
        let html = build_summary(&doc).render();
        assert!(!html.contains("novel-meta-section"));
        assert!(html.contains("summary-content"));
        assert!(!html.contains("Other characters"));
    }

    #[test]
    fn missing_chapter_count_is_unknown() {
        let doc = AnalysisDocument::from_json(r#"{"novel_info": {"world_setting": "Modern"}}"#).unwrap();
        let html = build_summary(&doc).render();
        assert!(html.contains(">unknown<"));
        assert!(html.contains("No summary yet"));
    }
}

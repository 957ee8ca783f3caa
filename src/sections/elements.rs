use crate::markup::{Element, Markup};
use crate::model::{AnalysisDocument, LewdElement};

use super::{empty_state, labeled};

fn element_card(element: &LewdElement) -> Element {
    let mut card = Element::new("div").class("element-card").child(
        Element::new("div")
            .class("element-header")
            .child(
                Element::new("span")
                    .class("element-type")
                    .text(element.kind.clone().unwrap_or_else(|| "?".to_string())),
            ),
    );
    if let Some(location) = element.chapter_location.as_deref().filter(|l| !l.trim().is_empty()) {
        card = card.child(Element::new("span").class("chapter-tag").text(location));
    }
    if let Some(example) = element.example.as_deref().filter(|e| !e.trim().is_empty()) {
        card = card.child(labeled("element-example", "Example", example));
    }
    if !element.involved_characters.is_empty() {
        card = card.child(
            Element::new("div").class("element-chars").children(
                element
                    .involved_characters
                    .iter()
                    .map(|name| Element::new("span").class("char-name-tag").text(name.clone())),
            ),
        );
    }
    card
}

/// Overview of the recurring erotic elements, one card each in document order.
pub fn build_lewd_elements(doc: &AnalysisDocument) -> Markup {
    let elements = doc.lewd_elements();
    let summary = doc.lewd_elements_summary.as_deref().filter(|s| !s.trim().is_empty());
    if elements.is_empty() && summary.is_none() {
        return empty_state("✨", "No related elements detected");
    }

    let mut parts: Vec<Markup> = Vec::new();
    if let Some(summary) = summary {
        parts.push(
            Element::new("div")
                .class("element-summary")
                .child(Element::new("div").class("summary-title").raw("Elements overview"))
                .child(Element::new("div").class("summary-content").text(summary))
                .into(),
        );
    }
    if !elements.is_empty() {
        parts.push(
            Element::new("div")
                .class("element-grid")
                .children(elements.iter().map(element_card))
                .into(),
        );
    }
    Markup::fragment(parts)
}

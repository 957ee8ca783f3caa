use crate::markup::{Element, Markup};
use crate::model::AnalysisDocument;

use super::empty_state;

/// Relationship progression as an ordered timeline. The first entry is the
/// origin point.
pub fn build_evolution(doc: &AnalysisDocument) -> Markup {
    let points = doc.evolution();
    if points.is_empty() {
        return empty_state("📈", "No evolution records");
    }

    Element::new("div")
        .class("timeline")
        .children(points.iter().enumerate().map(|(idx, point)| {
            let first = idx == 0;
            let mut header = Element::new("div")
                .class("timeline-header")
                .child(
                    Element::new("span")
                        .class("timeline-chapter")
                        .text(point.chapter.clone().unwrap_or_default()),
                )
                .child(
                    Element::new("span")
                        .class("timeline-stage")
                        .text(point.stage.clone().unwrap_or_default()),
                );
            if first {
                header = header.child(Element::new("span").class("timeline-origin").raw("origin"));
            }
            Element::new("div")
                .class(if first { "timeline-item first" } else { "timeline-item" })
                .child(Element::new("div").class("timeline-dot"))
                .child(
                    Element::new("div").class("timeline-content").child(header).child(
                        Element::new("div")
                            .class("timeline-desc")
                            .text(point.description.clone().unwrap_or_default()),
                    ),
                )
        }))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EvolutionPoint;

    fn point(chapter: &str, stage: &str) -> EvolutionPoint {
        EvolutionPoint {
            chapter: Some(chapter.to_string()),
            stage: Some(stage.to_string()),
            description: None,
        }
    }

    #[test]
    fn only_first_entry_is_origin() {
        let doc = AnalysisDocument {
            evolution: Some(vec![point("1", "meet"), point("7", "confess"), point("30", "wed")]),
            ..Default::default()
        };
        let html = build_evolution(&doc).render();
        assert_eq!(html.matches("timeline-item first").count(), 1);
        assert_eq!(html.matches("class=\"timeline-origin\"").count(), 1);
        let meet = html.find("meet").unwrap();
        let confess = html.find("confess").unwrap();
        let wed = html.find("wed").unwrap();
        assert!(meet < confess && confess < wed);
    }

    #[test]
    fn empty_timeline() {
        let html = build_evolution(&AnalysisDocument::default()).render();
        assert!(html.contains("No evolution records"));
    }
}

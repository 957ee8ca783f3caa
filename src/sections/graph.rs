use crate::config::{LayoutConfig, RenderConfig};
use crate::markup::{Element, Markup};
use crate::model::{AnalysisDocument, Relationship};
use crate::render::{GraphScene, RenderMode, legend_entries, render_graph};
use crate::theme::Theme;

use super::empty_state;

fn legend(scene: &GraphScene) -> Element {
    Element::new("div")
        .class("graph-legend")
        .children(legend_entries(&scene.theme).into_iter().map(|(gender, label, color)| {
            Element::new("span")
                .class(format!("legend-item {}", gender.css_class()))
                .child(
                    Element::new("span")
                        .class("legend-dot")
                        .attr("style", format!("background: {color}")),
                )
                .child(Element::new("span").class("legend-label").raw(label))
        }))
}

fn relationship_item(rel: &Relationship) -> Element {
    let mut item = Element::new("div").class("relationship-item").child(
        Element::new("div")
            .class("relationship-pair")
            .child(Element::new("span").class("rel-from").text(rel.from.clone()))
            .child(Element::new("span").class("rel-arrow").raw("→"))
            .child(Element::new("span").class("rel-to").text(rel.to.clone()))
            .child(
                Element::new("span")
                    .class("rel-type")
                    .text(rel.kind.clone().unwrap_or_default()),
            ),
    );
    if let Some(start) = rel.start_way.as_deref().filter(|s| !s.trim().is_empty()) {
        item = item.child(Element::new("div").class("rel-start").text(start));
    }
    if let Some(desc) = rel.description.as_deref().filter(|d| !d.trim().is_empty()) {
        item = item.child(Element::new("div").class("rel-desc").text(desc));
    }
    item
}

/// The graph section from an already rendered scene.
pub(crate) fn graph_section(scene: Option<&GraphScene>, doc: &AnalysisDocument) -> Markup {
    let Some(scene) = scene else {
        return empty_state("🔗", "No relationship data");
    };
    Markup::fragment([
        Element::new("div").class("graph-canvas").child(scene.to_markup()),
        legend(scene),
        Element::new("div")
            .class("relationship-list")
            .children(doc.relationships().iter().map(relationship_item)),
    ])
}

/// Relationship graph, legend, and the relationship list beneath it.
pub fn build_graph(
    doc: &AnalysisDocument,
    mode: RenderMode,
    theme: &Theme,
    layout: &LayoutConfig,
    render: &RenderConfig,
) -> Markup {
    let scene = render_graph(doc, mode, theme, layout, render);
    graph_section(scene.as_ref(), doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Character, Gender};

    fn build(doc: &AnalysisDocument) -> String {
        build_graph(
            doc,
            RenderMode::Interactive { mount: None },
            &Theme::dark(),
            &LayoutConfig::default(),
            &RenderConfig::default(),
        )
        .render()
    }

    #[test]
    fn characters_without_relationships_show_empty_state() {
        let doc = AnalysisDocument {
            characters: Some(vec![Character {
                name: "Lin".to_string(),
                gender: Gender::Male,
                ..Default::default()
            }]),
            relationships: Some(Vec::new()),
            ..Default::default()
        };
        let html = build(&doc);
        assert!(html.contains("empty-state"));
        assert!(html.contains("No relationship data"));
        assert!(!html.contains("<svg"));
    }

    #[test]
    fn lists_relationships_under_the_graph() {
        let doc = AnalysisDocument::from_json(
            r#"{
                "characters": [{"name": "Lin", "gender": "male"}, {"name": "Mei", "gender": "female"}],
                "relationships": [{"from": "Lin", "to": "Mei", "type": "lovers", "start_way": "rescue", "description": "<i>sweet</i>"}]
            }"#,
        )
        .unwrap();
        let html = build(&doc);
        assert!(html.contains("<svg"));
        assert!(html.contains("graph-legend"));
        assert!(html.contains("rescue"));
        assert!(html.contains("&lt;i&gt;sweet&lt;/i&gt;"));
        assert!(html.find("<svg").unwrap() < html.find("relationship-list").unwrap());
    }
}

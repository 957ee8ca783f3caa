use crate::markup::{Element, Markup};
use crate::model::{AnalysisDocument, IntimacyScene};

use super::{empty_state, or_unknown};

fn scene_card(scene: &IntimacyScene) -> Element {
    let mut card = Element::new("div").class("first-sex-card").child(
        Element::new("div")
            .class("first-sex-header")
            .child(
                Element::new("span")
                    .class("participants")
                    .text(scene.participants_joined(" + ")),
            )
            .child(
                Element::new("span")
                    .class("chapter-tag")
                    .text(scene.chapter.clone().unwrap_or_else(|| "?".to_string())),
            ),
    );
    if let Some(location) = scene.location.as_deref().filter(|l| !l.trim().is_empty()) {
        card = card.child(Element::new("div").class("first-sex-location").text(location));
    }
    if let Some(description) = scene.description.as_deref().filter(|d| !d.trim().is_empty()) {
        card = card.child(Element::new("div").class("first-sex-desc").text(description));
    }
    card
}

/// One card per first-intimacy scene, in document order.
pub fn build_first_intimacy(doc: &AnalysisDocument) -> Markup {
    let scenes = doc.first_intimacy();
    if scenes.is_empty() {
        return empty_state("💕", "No first intimacy records");
    }
    Element::new("div")
        .class("first-sex-list")
        .children(scenes.iter().map(scene_card))
        .into()
}

/// Total count plus the first `limit` scenes, numbered from 1. The total is the
/// declared count and never the length of the displayed slice.
pub fn build_intimacy_count(doc: &AnalysisDocument, limit: usize) -> Markup {
    let Some(tally) = doc.intimacy.as_ref() else {
        return empty_state("📊", "No statistics");
    };
    let total = tally.total();
    let scenes = tally.scenes();
    let shown = scenes.len().min(limit);

    let mut list = Element::new("div").class("scene-list").children(
        scenes[..shown].iter().enumerate().map(|(i, scene)| {
            Element::new("div")
                .class("scene-item")
                .child(Element::new("div").class("scene-number").text((i + 1).to_string()))
                .child(
                    Element::new("div")
                        .class("scene-info")
                        .child(
                            Element::new("span")
                                .class("scene-participants")
                                .text(scene.participants_joined(", ")),
                        )
                        .child(
                            Element::new("span")
                                .class("scene-chapter")
                                .text(scene.chapter.clone().unwrap_or_else(|| "?".to_string())),
                        )
                        .child(
                            Element::new("span")
                                .class("scene-location")
                                .text(or_unknown(scene.location.as_deref())),
                        ),
                )
        }),
    );
    if scenes.len() > shown {
        list = list.child(
            Element::new("div")
                .class("scene-more")
                .text(format!("+{} more", scenes.len() - shown)),
        );
    }

    Markup::fragment([
        Element::new("div")
            .class("stat-total")
            .child(Element::new("div").class("stat-total-value").text(total.to_string()))
            .child(Element::new("div").class("stat-total-label").raw("Intimate scenes")),
        list,
    ])
}

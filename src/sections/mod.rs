//! Report sections.
//!
//! Each builder is a pure function of the analysis document and returns a
//! [`Markup`] fragment. A builder whose required collection is missing or
//! empty returns an explicit empty-state fragment instead of an empty block.

mod characters;
mod elements;
mod evolution;
mod flags;
mod graph;
mod scenes;
mod summary;

pub use characters::{RankedCharacter, build_characters, lewdness_color, rank_female_roster};
pub use elements::build_lewd_elements;
pub use evolution::build_evolution;
pub use flags::{FlagCategory, build_sensitive_flags, sort_flags};
pub use graph::build_graph;
pub(crate) use graph::graph_section;
pub use scenes::{build_first_intimacy, build_intimacy_count};
pub use summary::build_summary;

use crate::markup::{Element, Markup};

/// Mount points and report tabs, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Summary,
    Characters,
    Graph,
    FirstIntimacy,
    IntimacyCount,
    Evolution,
    SensitiveFlags,
    LewdElements,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Summary,
        Section::Characters,
        Section::Graph,
        Section::FirstIntimacy,
        Section::IntimacyCount,
        Section::Evolution,
        Section::SensitiveFlags,
        Section::LewdElements,
    ];

    /// Element id of the section's mount point.
    pub fn mount_id(self) -> &'static str {
        match self {
            Section::Summary => "relationshipSummary",
            Section::Characters => "mainCharacters",
            Section::Graph => "relationshipChart",
            Section::FirstIntimacy => "firstIntimacy",
            Section::IntimacyCount => "intimacyCount",
            Section::Evolution => "relationshipProgress",
            Section::SensitiveFlags => "sensitiveFlags",
            Section::LewdElements => "lewdElements",
        }
    }

    pub fn tab_key(self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Characters => "characters",
            Section::Graph => "graph",
            Section::FirstIntimacy => "first",
            Section::IntimacyCount => "count",
            Section::Evolution => "evolution",
            Section::SensitiveFlags => "flags",
            Section::LewdElements => "elements",
        }
    }

    pub fn tab_label(self) -> &'static str {
        match self {
            Section::Summary => "Summary",
            Section::Characters => "Characters",
            Section::Graph => "Relationship graph",
            Section::FirstIntimacy => "First intimacy",
            Section::IntimacyCount => "Statistics",
            Section::Evolution => "Evolution",
            Section::SensitiveFlags => "Sensitive content",
            Section::LewdElements => "Erotic elements",
        }
    }
}

pub(crate) fn empty_state(icon: &'static str, text: &'static str) -> Markup {
    Element::new("div")
        .class("empty-state")
        .child(Element::new("div").class("empty-icon").raw(icon))
        .child(Element::new("div").class("empty-text").raw(text))
        .into()
}

/// Text of an optional field, or the "unknown" marker when unset or blank.
pub(crate) fn or_unknown(value: Option<&str>) -> String {
    crate::render::or_unknown(value).to_string()
}

pub(crate) fn labeled(class: &'static str, label: &'static str, value: impl Into<String>) -> Element {
    Element::new("div")
        .class(class)
        .child(Element::new("span").class("detail-label").raw(label))
        .child(Element::new("span").class("detail-value").text(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_ids_are_unique() {
        let mut ids: Vec<&str> = Section::ALL.iter().map(|s| s.mount_id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), Section::ALL.len());
    }

    #[test]
    fn empty_state_has_marker_class() {
        let html = empty_state("📖", "No data").render();
        assert!(html.starts_with("<div class=\"empty-state\">"));
        assert!(html.contains("No data"));
    }
}

//! Rendering into a live page.
//!
//! A host exposes named mount points. Each section is written into the mount
//! with its id; the graph is laid out against the graph mount's current size.

use crate::config::Config;
use crate::layout::CanvasSize;
use crate::model::AnalysisDocument;
use crate::render::{RenderMode, render_graph};
use crate::report::{QUICK_STATS_ID, QuickStats, section_markup};
use crate::sections::{Section, graph_section};
use std::collections::HashMap;
use tracing::debug;

pub trait MountHost {
    /// Current size of a mount point, if it exists and can be measured.
    fn mount_size(&self, id: &str) -> Option<CanvasSize>;

    /// Replaces a mount's content. Returns `false` when there is no such mount.
    fn mount(&mut self, id: &str, html: String) -> bool;
}

#[derive(Debug, Clone, Default)]
struct MountPoint {
    size: Option<CanvasSize>,
    html: Option<String>,
}

/// In-memory host, for tests and for hosts that collect fragments and place
/// them later.
#[derive(Debug, Clone, Default)]
pub struct MountRegistry {
    mounts: HashMap<String, MountPoint>,
}

impl MountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a mount for every section plus quick stats.
    pub fn with_all_sections(graph_size: Option<CanvasSize>) -> Self {
        let mut registry = Self::new();
        registry.register(QUICK_STATS_ID, None);
        for section in Section::ALL {
            let size = if section == Section::Graph { graph_size } else { None };
            registry.register(section.mount_id(), size);
        }
        registry
    }

    pub fn register(&mut self, id: impl Into<String>, size: Option<CanvasSize>) {
        self.mounts.insert(id.into(), MountPoint { size, html: None });
    }

    pub fn resize(&mut self, id: &str, size: Option<CanvasSize>) {
        if let Some(point) = self.mounts.get_mut(id) {
            point.size = size;
        }
    }

    pub fn content(&self, id: &str) -> Option<&str> {
        self.mounts.get(id).and_then(|point| point.html.as_deref())
    }
}

impl MountHost for MountRegistry {
    fn mount_size(&self, id: &str) -> Option<CanvasSize> {
        self.mounts.get(id).and_then(|point| point.size)
    }

    fn mount(&mut self, id: &str, html: String) -> bool {
        match self.mounts.get_mut(id) {
            Some(point) => {
                point.html = Some(html);
                true
            }
            None => false,
        }
    }
}

fn place<H: MountHost + ?Sized>(host: &mut H, id: &str, html: String) {
    if !host.mount(id, html) {
        debug!(mount = id, "mount point absent, section skipped");
    }
}

/// Writes every section and the quick stats into `host`. Absent mounts are
/// skipped; this never fails.
pub fn render_live<H: MountHost + ?Sized>(doc: &AnalysisDocument, host: &mut H, config: &Config) {
    let mount = host.mount_size(Section::Graph.mount_id());
    let scene = render_graph(
        doc,
        RenderMode::Interactive { mount },
        &config.theme,
        &config.layout,
        &config.render,
    );
    let graph = graph_section(scene.as_ref(), doc);

    place(host, QUICK_STATS_ID, QuickStats::from_document(doc).to_markup().render());
    for section in Section::ALL {
        let html = section_markup(section, doc, &graph, config).render();
        place(host, section.mount_id(), html);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> AnalysisDocument {
        AnalysisDocument::from_json(
            r#"{
                "characters": [{"name": "Lin", "gender": "male"}, {"name": "Mei", "gender": "female"}],
                "relationships": [{"from": "Lin", "to": "Mei", "type": "lovers"}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn fills_every_registered_mount() {
        let mut host = MountRegistry::with_all_sections(Some(CanvasSize::new(800.0, 500.0)));
        render_live(&doc(), &mut host, &Config::default());
        for section in Section::ALL {
            assert!(host.content(section.mount_id()).is_some(), "{:?}", section);
        }
        let graph = host.content("relationshipChart").unwrap();
        assert!(graph.contains("viewBox=\"0 0 800 500\""));
        assert!(graph.contains("width=\"100%\""));
        assert!(host.content(QUICK_STATS_ID).unwrap().contains("stat-card"));
    }

    #[test]
    fn missing_mounts_are_skipped() {
        let mut host = MountRegistry::new();
        host.register("mainCharacters", None);
        render_live(&doc(), &mut host, &Config::default());
        assert!(host.content("mainCharacters").unwrap().contains("Lin"));
        assert!(host.content("relationshipChart").is_none());
    }

    #[test]
    fn unmeasured_graph_mount_uses_fallback_canvas() {
        let mut host = MountRegistry::with_all_sections(None);
        render_live(&doc(), &mut host, &Config::default());
        assert!(host.content("relationshipChart").unwrap().contains("viewBox=\"0 0 600 400\""));

        host.resize("relationshipChart", Some(CanvasSize::new(1000.0, 700.0)));
        render_live(&doc(), &mut host, &Config::default());
        assert!(host.content("relationshipChart").unwrap().contains("viewBox=\"0 0 1000 700\""));
    }
}

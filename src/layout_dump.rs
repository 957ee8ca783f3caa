use crate::layout::LabelBox;
use crate::render::{Frame, GraphScene};
use crate::theme::ThemeMode;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Resolved graph geometry, written by `--dumpLayout` for debugging layouts
/// outside a browser.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub frame: Frame,
    pub theme: ThemeMode,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub name: String,
    pub glyph: &'static str,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub index: usize,
    pub from: String,
    pub to: String,
    pub points: [[f32; 2]; 2],
    pub label: LabelBox,
}

impl LayoutDump {
    pub fn from_scene(scene: &GraphScene) -> Self {
        let nodes = scene
            .nodes
            .iter()
            .map(|node| NodeDump {
                name: node.name.clone(),
                glyph: node.glyph,
                x: node.x,
                y: node.y,
                radius: scene.style.node_radius,
                color: node.color.clone(),
            })
            .collect();

        let edges = scene
            .edges
            .iter()
            .map(|edge| EdgeDump {
                index: edge.index,
                from: edge.from.clone(),
                to: edge.to.clone(),
                points: [[edge.x1, edge.y1], [edge.x2, edge.y2]],
                label: edge.label.clone(),
            })
            .collect();

        LayoutDump {
            width: scene.view_box.width,
            height: scene.view_box.height,
            frame: scene.frame,
            theme: scene.theme.mode,
            nodes,
            edges,
        }
    }
}

pub fn write_layout_dump(path: &Path, scene: &GraphScene) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_scene(scene);
    serde_json::to_writer_pretty(writer, &dump)?;
    tracing::info!(path = %path.display(), "wrote layout dump");
    Ok(())
}

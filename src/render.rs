use crate::config::{LayoutConfig, RenderConfig};
use crate::error::{ReportError, Result};
use crate::layout::{CanvasSize, LabelBox, PositionedNode, compute_layout, place_edge_label};
use crate::markup::{Element, Markup, fmt_num};
use crate::model::{AnalysisDocument, Gender};
use crate::theme::{Theme, ThemeMode};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Marker shown for any unset character field.
pub const UNKNOWN: &str = "unknown";

/// Coordinate space of a graph render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMode {
    /// Fitted to a live container. `mount` is the container's current size,
    /// if the host could measure it.
    Interactive { mount: Option<CanvasSize> },
    /// Fixed internal geometry; `display` only sizes the outer frame.
    Export { display: CanvasSize, mode: ThemeMode },
}

/// Outer size of the `<svg>` element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Frame {
    Fill,
    Fixed { width: f32, height: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeScene {
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub color: String,
    pub glyph: &'static str,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeScene {
    /// Index of the relationship this edge was built from.
    pub index: usize,
    pub from: String,
    pub to: String,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub label: LabelBox,
}

/// Fully resolved graph, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphScene {
    pub view_box: CanvasSize,
    pub frame: Frame,
    #[serde(skip)]
    pub theme: Theme,
    #[serde(skip)]
    pub style: LayoutConfig,
    pub edges: Vec<EdgeScene>,
    pub nodes: Vec<NodeScene>,
}

/// Resolves the canvas and palette for a mode. Export mode ignores the
/// supplied theme and uses the fixed palette for its light/dark mode.
fn resolve_mode(mode: RenderMode, theme: &Theme, render: &RenderConfig) -> (CanvasSize, Frame, Theme) {
    match mode {
        RenderMode::Interactive { mount } => {
            let canvas = mount
                .filter(CanvasSize::is_usable)
                .unwrap_or_else(|| render.fallback_canvas());
            (canvas, Frame::Fill, theme.clone())
        }
        RenderMode::Export { display, mode } => {
            let defaults = RenderConfig::default();
            let display = [display, render.display_size()]
                .into_iter()
                .find(CanvasSize::is_usable)
                .unwrap_or_else(|| defaults.display_size());
            let canvas = Some(render.export_canvas())
                .filter(CanvasSize::is_usable)
                .unwrap_or_else(|| defaults.export_canvas());
            (
                canvas,
                Frame::Fixed {
                    width: display.width,
                    height: display.height,
                },
                Theme::for_mode(mode),
            )
        }
    }
}

/// Builds the relationship graph scene. `None` means there is nothing to draw
/// (no character takes part in a relationship) and the caller should show the
/// empty state.
pub fn render_graph(
    doc: &AnalysisDocument,
    mode: RenderMode,
    theme: &Theme,
    layout: &LayoutConfig,
    render: &RenderConfig,
) -> Option<GraphScene> {
    let (canvas, frame, theme) = resolve_mode(mode, theme, render);
    let nodes = compute_layout(doc.characters(), doc.relationships(), canvas, &theme, layout);
    if nodes.is_empty() {
        debug!("no connected characters, graph left empty");
        return None;
    }
    debug!(
        nodes = nodes.len(),
        width = canvas.width,
        height = canvas.height,
        "graph layout computed"
    );

    // Duplicate names resolve to the first node drawn.
    let mut by_name: HashMap<&str, &PositionedNode<'_>> = HashMap::with_capacity(nodes.len());
    for node in &nodes {
        by_name.entry(node.name()).or_insert(node);
    }

    let mut edges = Vec::new();
    for (idx, rel) in doc.relationships().iter().enumerate() {
        let (Some(source), Some(target)) = (by_name.get(rel.from.as_str()), by_name.get(rel.to.as_str())) else {
            debug!(from = %rel.from, to = %rel.to, "dropping edge with unresolved endpoint");
            continue;
        };
        let text = rel.kind.as_deref().unwrap_or_default();
        edges.push(EdgeScene {
            index: idx,
            from: rel.from.clone(),
            to: rel.to.clone(),
            x1: source.x,
            y1: source.y,
            x2: target.x,
            y2: target.y,
            label: place_edge_label(source, target, idx, text, layout),
        });
    }

    let nodes = nodes
        .iter()
        .map(|node| NodeScene {
            name: node.character.name.clone(),
            x: node.x,
            y: node.y,
            color: node.color.clone(),
            glyph: node.character.gender.glyph(),
            tooltip: node_tooltip(node),
        })
        .collect();

    Some(GraphScene {
        view_box: canvas,
        frame,
        theme,
        style: layout.clone(),
        edges,
        nodes,
    })
}

pub(crate) fn or_unknown(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => UNKNOWN,
    }
}

fn node_tooltip(node: &PositionedNode<'_>) -> String {
    let c = node.character;
    format!(
        "{}\n{}\n{}\n\nPreferences: {}",
        c.name,
        or_unknown(c.identity.as_deref()),
        or_unknown(c.personality.as_deref()),
        or_unknown(c.sexual_preferences.as_deref()),
    )
}

impl GraphScene {
    pub fn to_markup(&self) -> Markup {
        let theme = &self.theme;
        let style = &self.style;
        let (width, height) = match self.frame {
            Frame::Fill => ("100%".to_string(), "100%".to_string()),
            Frame::Fixed { width, height } => (fmt_num(width), fmt_num(height)),
        };

        let mut svg = Element::new("svg")
            .attr("xmlns", "http://www.w3.org/2000/svg")
            .attr("width", width)
            .attr("height", height)
            .attr(
                "viewBox",
                format!("0 0 {} {}", fmt_num(self.view_box.width), fmt_num(self.view_box.height)),
            )
            .attr("font-family", theme.font_family.clone())
            .child(
                Element::new("rect")
                    .attr("width", "100%")
                    .attr("height", "100%")
                    .attr("fill", theme.background.clone()),
            );

        for edge in &self.edges {
            let label = &edge.label;
            svg = svg
                .child(
                    Element::new("line")
                        .num("x1", edge.x1)
                        .num("y1", edge.y1)
                        .num("x2", edge.x2)
                        .num("y2", edge.y2)
                        .attr("stroke", theme.primary_color.clone())
                        .num("stroke-width", style.edge_stroke_width)
                        .num("stroke-opacity", style.edge_opacity),
                )
                .child(
                    Element::new("rect")
                        .num("x", label.rect_x)
                        .num("y", label.rect_y)
                        .num("width", label.width)
                        .num("height", label.height)
                        .attr("rx", "4")
                        .attr("fill", theme.background.clone()),
                )
                .child(
                    Element::new("text")
                        .num("x", label.x)
                        .num("y", label.baseline_y)
                        .attr("text-anchor", "middle")
                        .attr("fill", theme.text_secondary.clone())
                        .num("font-size", style.label_font_size)
                        .text(label.text.clone()),
                );
        }

        for node in &self.nodes {
            let group = Element::new("g")
                .attr("class", "graph-node")
                .attr("style", "cursor: pointer")
                .child(
                    Element::new("circle")
                        .num("cx", node.x)
                        .num("cy", node.y)
                        .num("r", style.halo_radius)
                        .attr("fill", node.color.clone())
                        .attr("fill-opacity", "0.2"),
                )
                .child(
                    Element::new("circle")
                        .num("cx", node.x)
                        .num("cy", node.y)
                        .num("r", style.node_radius)
                        .attr("fill", node.color.clone())
                        .attr("stroke", theme.text_primary.clone())
                        .attr("stroke-width", "2")
                        .attr("stroke-opacity", "0.3"),
                )
                .child(
                    Element::new("text")
                        .num("x", node.x)
                        .num("y", node.y + style.glyph_offset_y)
                        .attr("text-anchor", "middle")
                        .attr("fill", "#ffffff")
                        .num("font-size", style.glyph_font_size)
                        .attr("font-weight", "600")
                        .text(node.glyph),
                )
                .child(
                    Element::new("text")
                        .num("x", node.x)
                        .num("y", node.y + style.name_offset_y)
                        .attr("text-anchor", "middle")
                        .attr("fill", theme.text_primary.clone())
                        .num("font-size", style.name_font_size)
                        .text(node.name.clone()),
                )
                .child(Element::new("title").text(node.tooltip.clone()));
            svg = svg.child(group);
        }

        svg.into()
    }

    pub fn to_svg(&self) -> String {
        self.to_markup().render()
    }
}

/// Node color lookup by gender for legends drawn outside the scene.
pub fn legend_entries(theme: &Theme) -> [(Gender, &'static str, &str); 3] {
    [
        (Gender::Male, "Male", theme.info_color.as_str()),
        (Gender::Female, "Female", theme.error_color.as_str()),
        (Gender::Unknown, "Other", theme.primary_color.as_str()),
    ]
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg).map_err(|source| ReportError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            info!(path = %path.display(), "wrote svg");
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> anyhow::Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.fontdb_mut().load_system_fonts();
    opt.default_size = usvg::Size::from_wh(render_cfg.display_width, render_cfg.display_height)
        .ok_or_else(|| anyhow::anyhow!("Invalid display size"))?;

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    info!(path = %output.display(), "wrote png");
    Ok(())
}

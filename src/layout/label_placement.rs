// Edge label placement. Pure geometry, no markup.
//
// Labels sit at the edge midpoint, pushed along the edge normal into one of
// three lanes chosen by edge index. This is a heuristic: two edges whose
// indices agree mod 3 and whose midpoints coincide still overlap.

use super::{LabelBox, PositionedNode};
use crate::config::LayoutConfig;

const LABEL_LANES: usize = 3;

/// Signed normal offset for an edge: lanes cycle -step, 0, +step.
pub fn label_offset(edge_index: usize, step: f32) -> f32 {
    ((edge_index % LABEL_LANES) as f32 - 1.0) * step
}

/// Unit normal of the segment `from -> to`. Zero-length segments divide by 1
/// and therefore yield `(0, 0)`.
fn unit_normal(from: (f32, f32), to: (f32, f32)) -> (f32, f32) {
    let dx = to.0 - from.0;
    let dy = to.1 - from.1;
    let mut len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 || !len.is_finite() {
        len = 1.0;
    }
    (-dy / len, dx / len)
}

pub fn label_width(text: &str, config: &LayoutConfig) -> f32 {
    let chars = text.chars().count().max(config.label_min_chars);
    chars as f32 * config.label_char_width
}

pub fn place_edge_label(
    source: &PositionedNode<'_>,
    target: &PositionedNode<'_>,
    edge_index: usize,
    text: &str,
    config: &LayoutConfig,
) -> LabelBox {
    place_between((source.x, source.y), (target.x, target.y), edge_index, text, config)
}

pub(crate) fn place_between(
    from: (f32, f32),
    to: (f32, f32),
    edge_index: usize,
    text: &str,
    config: &LayoutConfig,
) -> LabelBox {
    let mid_x = (from.0 + to.0) / 2.0;
    let mid_y = (from.1 + to.1) / 2.0;
    let (perp_x, perp_y) = unit_normal(from, to);
    let offset = label_offset(edge_index, config.label_offset_step);
    let x = mid_x + perp_x * offset;
    let y = mid_y + perp_y * offset;

    let text_width = label_width(text, config);
    let half_height = config.label_height / 2.0;
    LabelBox {
        x,
        y,
        offset,
        text: text.to_string(),
        rect_x: x - text_width / 2.0 - config.label_padding_x,
        rect_y: y - half_height - 2.0,
        width: text_width + config.label_padding_x * 2.0,
        height: config.label_height,
        baseline_y: y + 3.0,
    }
}

use std::collections::HashSet;
use std::f32::consts::PI;

use crate::config::LayoutConfig;
use crate::model::{Character, Gender, Relationship};
use crate::theme::Theme;

use super::{CanvasSize, PositionedNode};

/// Angle of node `index` out of `count`: first node at 12 o'clock, clockwise.
pub fn node_angle(index: usize, count: usize) -> f32 {
    if count == 0 {
        return -PI / 2.0;
    }
    (index as f32 / count as f32) * 2.0 * PI - PI / 2.0
}

/// Characters named by at least one relationship endpoint, in input order.
pub fn connected_characters<'a>(
    characters: &'a [Character],
    relationships: &[Relationship],
) -> Vec<&'a Character> {
    let mut referenced: HashSet<&str> = HashSet::new();
    for rel in relationships {
        referenced.insert(rel.from.as_str());
        referenced.insert(rel.to.as_str());
    }
    characters
        .iter()
        .filter(|c| referenced.contains(c.name.as_str()))
        .collect()
}

pub fn node_color(gender: Gender, theme: &Theme) -> &str {
    match gender {
        Gender::Male => &theme.info_color,
        Gender::Female => &theme.error_color,
        Gender::Unknown => &theme.primary_color,
    }
}

/// Places every connected character on a circle of radius
/// `radius_factor * min(width, height)` around the canvas center.
///
/// Returns an empty list when no character takes part in a relationship; the
/// caller renders the empty state in that case.
pub fn compute_layout<'a>(
    characters: &'a [Character],
    relationships: &[Relationship],
    canvas: CanvasSize,
    theme: &Theme,
    config: &LayoutConfig,
) -> Vec<PositionedNode<'a>> {
    let connected = connected_characters(characters, relationships);
    if connected.is_empty() {
        return Vec::new();
    }

    let (center_x, center_y) = canvas.center();
    let radius = canvas.width.min(canvas.height) * config.radius_factor;
    let count = connected.len();

    connected
        .into_iter()
        .enumerate()
        .map(|(idx, character)| {
            let angle = node_angle(idx, count);
            PositionedNode {
                character,
                x: center_x + angle.cos() * radius,
                y: center_y + angle.sin() * radius,
                color: node_color(character.gender, theme).to_string(),
            }
        })
        .collect()
}

//! Plain-text rendering of the semantic tree.

use habsnap_core::{ItemsIndex, LocationNode, PointRef};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Render the forest as an indented outline, one item per line.
pub fn render(index: &ItemsIndex) -> String {
    let mut out = String::new();
    for root in &index.semantic_tree.locations {
        render_location(&mut out, index, root, 0);
    }
    out
}

fn render_location(out: &mut String, index: &ItemsIndex, node: &LocationNode, depth: usize) {
    line(out, index, &node.item, "location", depth);
    for eq in &node.equipment {
        line(out, index, &eq.item, "equipment", depth + 1);
        render_points(out, index, &eq.points, depth + 2);
    }
    render_points(out, index, &node.points, depth + 1);
    for child in &node.children_locations {
        render_location(out, index, child, depth + 1);
    }
}

fn render_points(out: &mut String, index: &ItemsIndex, points: &[PointRef], depth: usize) {
    for point in points {
        line(out, index, &point.item, "point", depth);
    }
}

fn line(out: &mut String, index: &ItemsIndex, name: &str, kind: &str, depth: usize) {
    let label = index
        .items_by_name
        .get(name)
        .and_then(|item| item.label.as_deref())
        .filter(|label| *label != name);

    let _ = write!(out, "{}{} [{}]", INDENT.repeat(depth), name, kind);
    if let Some(label) = label {
        let _ = write!(out, " \"{}\"", label);
    }
    out.push('\n');
}

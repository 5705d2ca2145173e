// Layout solver: turns weights into pixel rects, top-down.

use std::collections::HashMap;

use dockyard_core::{Geometry, LayoutError, NodeId, Rect};

use crate::node::{Node, NodeKind};
use crate::span::{self, WeightedSpan, WEIGHT_EPSILON};

/// Assign `rect` to `node` and lay out its subtree.
///
/// Each child of a container gets `available × weight / count` along the
/// container's axis, with the last child taking the remainder so siblings
/// tile the parent exactly. A lone child is forced to weight 1.
pub(crate) fn solve(node: &mut Node, rect: Rect) -> Result<(), LayoutError> {
    if rect.is_empty() {
        return Err(LayoutError::GeometryUnavailable);
    }
    solve_unchecked(node, rect);
    Ok(())
}

fn solve_unchecked(node: &mut Node, rect: Rect) {
    node.rect = Some(rect);
    let NodeKind::Container(c) = &mut node.kind else {
        return;
    };
    let count = c.children.len();
    if count == 0 {
        return;
    }
    if count == 1 {
        c.weights[0] = 1.0;
    } else {
        let sum: f32 = c.weights.iter().sum();
        if (sum - count as f32).abs() > WEIGHT_EPSILON {
            log::debug!("container {}: weight sum {} drifted from {}, renormalizing", node.id, sum, count);
            span::normalize(&mut c.weights);
        }
    }

    let available = c.axis.extent(rect);
    let mut offset = 0.0;
    for (i, child) in c.children.iter_mut().enumerate() {
        let span = if i + 1 == count {
            available - offset
        } else {
            WeightedSpan::new(c.weights[i], count).to_pixels(available)
        };
        let child_rect = c.axis.slice(rect, offset, span);
        offset += span;
        solve_unchecked(child, child_rect);
    }
}

/// Re-derive every container's weights from measured child extents:
/// `child extent / container extent × child count`. Containers whose
/// geometry isn't fully measured keep their weights.
pub(crate) fn rederive_weights(node: &mut Node, geometry: &dyn Geometry) {
    let id = node.id;
    let NodeKind::Container(c) = &mut node.kind else {
        return;
    };
    let measured = geometry.bounds(id).and_then(|own| {
        let extents: Option<Vec<f32>> = c
            .children
            .iter()
            .map(|child| geometry.bounds(child.id).map(|r| c.axis.extent(r)))
            .collect();
        span::rederive(&extents?, c.axis.extent(own))
    });
    match measured {
        Some(weights) => c.weights = weights,
        None => log::trace!("container {id}: geometry not measured, keeping weights"),
    }
    for child in &mut c.children {
        rederive_weights(child, geometry);
    }
}

/// Snapshot of the solved geometry, detached from the tree so it can be
/// fed back into [`rederive_weights`].
pub(crate) fn measured(node: &Node) -> HashMap<NodeId, Rect> {
    let mut out = Vec::new();
    collect_rects(node, &mut out);
    out.into_iter().collect()
}

/// Rects of every node, pre-order.
pub(crate) fn collect_rects(node: &Node, out: &mut Vec<(NodeId, Rect)>) {
    node.visit(&mut |n: &Node| {
        if let Some(rect) = n.rect {
            out.push((n.id, rect));
        }
    });
}

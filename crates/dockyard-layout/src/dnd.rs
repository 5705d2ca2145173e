// Tab drag & drop: drag sessions, drop-zone classification and the tree
// surgery a drop performs.

use dockyard_core::{
    Axis, DragPayload, DropRejection, DropZone, ItemId, LayoutError, NodeId, Rect, Signal, Vec2,
};

use crate::node::Node;
use crate::Workspace;

/// A layout drag in progress. Created when a tab drag starts, cleared on
/// drop or drag end.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub item: ItemId,
    pub source_group: NodeId,
    pub hover: Option<DropPreview>,
}

/// Where a drop at the current pointer position would land.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropPreview {
    pub group: NodeId,
    pub zone: DropZone,
    /// Area to tint: the edge strip for a directional zone, the whole group
    /// for center.
    pub highlight: Rect,
}

/// Width of the edge strips: a fraction of the group's shorter side.
pub fn edge_margin(bounds: Rect, fraction: f32) -> f32 {
    bounds.width.min(bounds.height) * fraction
}

/// Classify `position` within `bounds`. Edges are tested top, bottom, left,
/// right, so corners resolve to the vertical zones.
pub fn classify_zone(bounds: Rect, position: Vec2, fraction: f32) -> DropZone {
    let margin = edge_margin(bounds, fraction);
    if position.y < bounds.y + margin {
        DropZone::Top
    } else if position.y > bounds.bottom() - margin {
        DropZone::Bottom
    } else if position.x < bounds.x + margin {
        DropZone::Left
    } else if position.x > bounds.right() - margin {
        DropZone::Right
    } else {
        DropZone::Center
    }
}

pub fn drop_highlight(bounds: Rect, zone: DropZone, fraction: f32) -> Rect {
    let margin = edge_margin(bounds, fraction);
    match zone {
        DropZone::Top => Rect::new(bounds.x, bounds.y, bounds.width, margin),
        DropZone::Bottom => Rect::new(bounds.x, bounds.bottom() - margin, bounds.width, margin),
        DropZone::Left => Rect::new(bounds.x, bounds.y, margin, bounds.height),
        DropZone::Right => Rect::new(bounds.right() - margin, bounds.y, margin, bounds.height),
        DropZone::Center => bounds,
    }
}

impl Workspace {
    /// Start a layout drag. Returns false for drags that aren't tab drags
    /// or whose payload names no live item; those are left to other handlers.
    pub fn begin_drag(&mut self, payload: &DragPayload) -> bool {
        if !payload.is_layout_drag() || self.resize.is_dragging() {
            return false;
        }
        let Some(root) = &self.root else {
            return false;
        };
        let Some(item) = root.find_item_by_tab(&payload.value) else {
            log::debug!("drag payload {:?} names no item", payload.value);
            return false;
        };
        let Some(source_group) = root.group_of(item) else {
            return false;
        };
        log::debug!("drag start: item {item} from group {source_group}");
        self.drag = Some(DragSession {
            item,
            source_group,
            hover: None,
        });
        true
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Update the hover preview for the pointer at `position`. `None` when
    /// no session is active or the pointer isn't over a group.
    pub fn drag_over(&mut self, position: Vec2) -> Option<DropPreview> {
        self.drag.as_ref()?;
        let preview = self.preview_at(position);
        if let Some(session) = &mut self.drag {
            session.hover = preview;
        }
        preview
    }

    /// The pointer left the group under it; clear the highlight.
    pub fn drag_leave(&mut self) {
        if let Some(session) = &mut self.drag {
            session.hover = None;
        }
    }

    /// Abandon the drag without changing the tree.
    pub fn end_drag(&mut self) {
        if self.drag.take().is_some() {
            log::debug!("drag ended without drop");
        }
    }

    /// Drop the dragged item at `position`. The session ends either way. A
    /// session whose item was moved or removed since the drag began is
    /// rejected.
    pub fn drop_at(&mut self, position: Vec2) -> Result<(), LayoutError> {
        let Some(session) = self.drag.take() else {
            return Err(LayoutError::InvalidDrop(DropRejection::NoSession));
        };
        let result = if self.group_of(session.item) != Some(session.source_group) {
            Err(LayoutError::InvalidDrop(DropRejection::SourceChanged))
        } else {
            match self.preview_at(position) {
                Some(preview) => self.move_item(session.item, preview.group, preview.zone),
                None => Err(LayoutError::InvalidDrop(DropRejection::NoTarget)),
            }
        };
        if let Err(e) = &result {
            log::debug!("drop of item {} aborted: {e}", session.item);
        }
        result
    }

    fn preview_at(&self, position: Vec2) -> Option<DropPreview> {
        let root = self.root.as_ref()?;
        let group = root.group_at(position)?;
        let node = root.find(group)?;
        let bounds = node.rect?;
        let fraction = node.as_group()?.config.edge_margin_fraction;
        let zone = classify_zone(bounds, position, fraction);
        Some(DropPreview {
            group,
            zone,
            highlight: drop_highlight(bounds, zone, fraction),
        })
    }

    /// Move `item` relative to the group `target`.
    ///
    /// Center appends it to `target` as the active item. A directional zone
    /// splits it off into a new group beside `target`: above or below within
    /// the enclosing row, left or right at the level of the enclosing column.
    /// Rejected drops leave the tree untouched.
    pub fn move_item(&mut self, item: ItemId, target: NodeId, zone: DropZone) -> Result<(), LayoutError> {
        let reject = |reason| Err(LayoutError::InvalidDrop(reason));
        let Some(root) = &self.root else {
            return reject(DropRejection::NoTarget);
        };
        let Some(source) = root.group_of(item) else {
            return reject(DropRejection::UnknownPayload(item.to_string()));
        };
        let Some(target_group) = root.find(target).and_then(Node::as_group) else {
            return reject(DropRejection::NoTarget);
        };

        match zone.split_axis() {
            None => {
                if source == target {
                    return reject(DropRejection::SameGroup);
                }
                let moved = self.detach_or_reject(item)?;
                match self.group_mut(target) {
                    Some(group) => group.push(moved),
                    None => {
                        return Err(LayoutError::InvariantViolation(format!(
                            "drop target {target} vanished while detaching"
                        )))
                    }
                }
            }
            Some(axis) => {
                if source == target && target_group.len() == 1 {
                    return reject(DropRejection::LastItemOntoItself);
                }
                let config = target_group.config;
                let moved = self.detach_or_reject(item)?;
                let group = Node::group(self.alloc_node_id(), vec![moved], config);
                let before = zone.inserts_before();
                match axis {
                    Axis::Row => self.insert_beside(target, group, Axis::Row, before)?,
                    Axis::Column => {
                        let (anchor, node) = self.column_unit(target, group);
                        self.insert_beside(anchor, node, Axis::Column, before)?;
                    }
                }
            }
        }

        log::debug!("moved item {item} to group {target} ({zone:?})");
        self.resize.reset();
        self.enforce_invariants();
        self.relayout(Signal::Layout);
        Ok(())
    }

    fn detach_or_reject(&mut self, item: ItemId) -> Result<crate::ContentItem, LayoutError> {
        self.detach_item(item).ok_or_else(|| {
            LayoutError::InvalidDrop(DropRejection::UnknownPayload(item.to_string()))
        })
    }

    /// What a left/right drop inserts, and beside what. When `target` sits in
    /// a row, the whole row is the unit and the new group gets a row of its
    /// own, mirroring its shape.
    fn column_unit(&mut self, target: NodeId, group: Node) -> (NodeId, Node) {
        let row = self
            .parent_of(target)
            .and_then(|id| self.container(id).map(|c| (id, c)))
            .filter(|(_, c)| c.axis == Axis::Row)
            .map(|(id, c)| (id, c.config));
        match row {
            Some((row_id, config)) => {
                let wrapper = Node::container(self.alloc_node_id(), Axis::Row, vec![group], config);
                (row_id, wrapper)
            }
            None => (target, group),
        }
    }

    /// Insert `node` before or after `anchor` along `axis`. Splits the
    /// anchor's span in its parent when the parent already runs along `axis`,
    /// otherwise wraps the anchor in place in a new two-child container.
    fn insert_beside(&mut self, anchor: NodeId, node: Node, axis: Axis, before: bool) -> Result<(), LayoutError> {
        let wrapper_id = self.alloc_node_id();
        let config = self.settings.container_config();
        let missing = || LayoutError::InvariantViolation(format!("node {anchor} not in tree"));

        let root = self.root.as_mut().ok_or_else(missing)?;
        let path = root.path_to(anchor).ok_or_else(missing)?;
        if let Some((&index, parent_path)) = path.split_last() {
            if let Some(parent) = root.at_path_mut(parent_path).and_then(Node::as_container_mut) {
                if parent.axis == axis {
                    parent.split_child(index, node, before);
                    return Ok(());
                }
            }
        }

        let slot = root.at_path_mut(&path).ok_or_else(missing)?;
        let rect = slot.rect;
        let placeholder = Node::container(wrapper_id, axis, Vec::new(), config);
        let old = std::mem::replace(slot, placeholder);
        slot.rect = rect;
        if let Some(wrapper) = slot.as_container_mut() {
            wrapper.children = if before { vec![node, old] } else { vec![old, node] };
            wrapper.weights = vec![1.0; 2];
        }
        log::debug!("wrapped node {anchor} in new {axis:?} container {wrapper_id}");
        Ok(())
    }
}

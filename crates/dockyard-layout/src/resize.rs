// Resize controller: pointer-driven divider hover and drag.
//
//   Idle ──move near boundary──▶ Hover ──down──▶ Dragging
//    ▲                            │                 │
//    └────────move away / cancel──┘◀──up / cancel───┘
//
// A single controller serves the whole tree: the first container (pre-order)
// whose boundary test passes captures the pointer until the gesture ends,
// so at most one container is ever hovered or dragged.

use dockyard_core::{Axis, NodeId, PointerEvent, Rect, Vec2};

use crate::node::{Container, Node, NodeKind};
use crate::span::{is_valid_weight, WeightedSpan};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeState {
    Idle,
    Hover {
        container: NodeId,
        pair: usize,
    },
    Dragging {
        container: NodeId,
        pair: usize,
        last: Vec2,
    },
}

/// What a pointer event did to the resize gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEffect {
    /// Not near any boundary; the event is free for other handlers.
    Ignored,
    /// Pointer is over a boundary (entered or still there).
    Hover,
    /// Pointer left the boundary it was hovering.
    Unhover,
    /// Drag started.
    Pressed,
    /// Weights changed; the tree needs a solve.
    Resized,
    /// The move would have shrunk a side below its minimum; nothing changed.
    Clamped,
    /// Drag ended; deltas already applied stay.
    Settled,
}

/// The divider indicator for the hovered or dragged boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divider {
    pub container: NodeId,
    pub pair: usize,
    pub axis: Axis,
    pub rect: Rect,
    /// True while dragging.
    pub active: bool,
}

#[derive(Debug)]
pub struct ResizeController {
    state: ResizeState,
}

impl ResizeController {
    pub fn new() -> Self {
        Self {
            state: ResizeState::Idle,
        }
    }

    pub fn state(&self) -> ResizeState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ResizeState::Dragging { .. })
    }

    /// Drop any gesture in progress, e.g. after the tree changed shape.
    pub(crate) fn reset(&mut self) {
        self.state = ResizeState::Idle;
    }

    pub(crate) fn handle(&mut self, root: Option<&mut Node>, event: PointerEvent) -> ResizeEffect {
        let Some(root) = root else {
            self.state = ResizeState::Idle;
            return ResizeEffect::Ignored;
        };
        match event {
            PointerEvent::Move { position } => self.pointer_move(root, position),
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Up { .. } | PointerEvent::Cancel => self.release(event),
        }
    }

    fn pointer_move(&mut self, root: &mut Node, position: Vec2) -> ResizeEffect {
        match self.state {
            ResizeState::Dragging { container, pair, last } => {
                self.state = ResizeState::Dragging {
                    container,
                    pair,
                    last: position,
                };
                let Some(node) = find_mut(root, container) else {
                    log::debug!("resize target {container} vanished mid-drag");
                    self.state = ResizeState::Idle;
                    return ResizeEffect::Settled;
                };
                drag_step(node, pair, last, position)
            }
            ResizeState::Idle | ResizeState::Hover { .. } => {
                let was_hovering = matches!(self.state, ResizeState::Hover { .. });
                match hit_test(root, position) {
                    Some((container, pair)) => {
                        self.state = ResizeState::Hover { container, pair };
                        ResizeEffect::Hover
                    }
                    None => {
                        self.state = ResizeState::Idle;
                        if was_hovering {
                            ResizeEffect::Unhover
                        } else {
                            ResizeEffect::Ignored
                        }
                    }
                }
            }
        }
    }

    fn pointer_down(&mut self, position: Vec2) -> ResizeEffect {
        match self.state {
            ResizeState::Hover { container, pair } => {
                log::debug!("resize start: container {container}, boundary {pair}");
                self.state = ResizeState::Dragging {
                    container,
                    pair,
                    last: position,
                };
                ResizeEffect::Pressed
            }
            ResizeState::Dragging { .. } => ResizeEffect::Hover,
            ResizeState::Idle => ResizeEffect::Ignored,
        }
    }

    fn release(&mut self, event: PointerEvent) -> ResizeEffect {
        match self.state {
            ResizeState::Dragging { container, .. } => {
                log::debug!("resize end on container {container} ({event:?})");
                self.state = ResizeState::Idle;
                ResizeEffect::Settled
            }
            ResizeState::Hover { .. } if event == PointerEvent::Cancel => {
                self.state = ResizeState::Idle;
                ResizeEffect::Unhover
            }
            ResizeState::Hover { .. } => ResizeEffect::Hover,
            ResizeState::Idle => ResizeEffect::Ignored,
        }
    }

    /// Indicator geometry for the current boundary, if any.
    pub(crate) fn divider(&self, root: &Node) -> Option<Divider> {
        let (container, pair, active) = match self.state {
            ResizeState::Idle => return None,
            ResizeState::Hover { container, pair } => (container, pair, false),
            ResizeState::Dragging { container, pair, .. } => (container, pair, true),
        };
        let c = root.find(container)?.as_container()?;
        let before = c.children.get(pair)?.rect?;
        let boundary = c.axis.start(before) + c.axis.extent(before);
        let (cross_start, cross_end) = c.axis.cross_range(before);
        let thickness = c.config.divider_tolerance.max(1.0);
        let rect = match c.axis {
            Axis::Column => Rect::new(
                boundary - thickness / 2.0,
                cross_start,
                thickness,
                cross_end - cross_start,
            ),
            Axis::Row => Rect::new(
                cross_start,
                boundary - thickness / 2.0,
                cross_end - cross_start,
                thickness,
            ),
        };
        Some(Divider {
            container,
            pair,
            axis: c.axis,
            rect,
            active,
        })
    }
}

impl Default for ResizeController {
    fn default() -> Self {
        Self::new()
    }
}

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

fn find_mut(root: &mut Node, id: NodeId) -> Option<&mut Node> {
    let path = root.path_to(id)?;
    root.at_path_mut(&path)
}

/// First container, pre-order, with a boundary under `position`.
fn hit_test(node: &Node, position: Vec2) -> Option<(NodeId, usize)> {
    let NodeKind::Container(c) = &node.kind else {
        return None;
    };
    if let Some(pair) = boundary_at(c, position) {
        return Some((node.id, pair));
    }
    c.children.iter().find_map(|child| hit_test(child, position))
}

/// Index `i` of the boundary between children `i` and `i + 1` that lies
/// within the divider tolerance of `position`. Only the container's own
/// axis is tested.
fn boundary_at(c: &Container, position: Vec2) -> Option<usize> {
    let along = c.axis.coord(position);
    let across = c.axis.cross_coord(position);
    let tolerance = c.config.divider_tolerance;
    c.children
        .windows(2)
        .enumerate()
        .find_map(|(i, pair)| {
            let before = pair[0].rect?;
            pair[1].rect?;
            let boundary = c.axis.start(before) + c.axis.extent(before);
            let (cross_start, cross_end) = c.axis.cross_range(before);
            let near = (along - boundary).abs() <= tolerance;
            let spanned = across >= cross_start && across <= cross_end;
            (near && spanned).then_some(i)
        })
}

/// Move the boundary after child `pair` by the pointer's travel along the
/// axis since the previous event.
fn drag_step(node: &mut Node, pair: usize, last: Vec2, position: Vec2) -> ResizeEffect {
    let Some(own) = node.rect else {
        return ResizeEffect::Clamped;
    };
    let Some(c) = node.as_container_mut() else {
        return ResizeEffect::Clamped;
    };
    let delta = c.axis.coord(position) - c.axis.coord(last);
    if delta == 0.0 {
        return ResizeEffect::Clamped;
    }
    let (Some(before), Some(after)) = (
        c.children.get(pair).and_then(|n| n.rect),
        c.children.get(pair + 1).and_then(|n| n.rect),
    ) else {
        return ResizeEffect::Clamped;
    };

    let (Some(before_span), Some(after_span)) = (c.span(pair), c.span(pair + 1)) else {
        return ResizeEffect::Clamped;
    };
    if !before_span.admits(c.axis.extent(before), delta)
        || !after_span.admits(c.axis.extent(after), -delta)
    {
        log::trace!("resize delta {delta} clamped at boundary {pair}");
        return ResizeEffect::Clamped;
    }

    let count = c.weights.len();
    let dw = WeightedSpan::delta_weight(delta, c.axis.extent(own), count);
    let grown = c.weights[pair] + dw;
    let shrunk = c.weights[pair + 1] - dw;
    if !is_valid_weight(grown) || !is_valid_weight(shrunk) {
        return ResizeEffect::Clamped;
    }
    c.weights[pair] = grown;
    c.weights[pair + 1] = shrunk;
    ResizeEffect::Resized
}

// Panel layout engine: a tree of containers and tab groups, the weight
// solver, the divider resize gesture and tab drag & drop.

mod bus;
mod dnd;
mod node;
mod resize;
mod solve;
mod span;
mod tests;

use std::rc::Rc;

use dockyard_core::{
    Geometry, ItemId, ItemSpec, LayoutError, LayoutSettings, NodeId, NodeSpec,
    PointerEvent, Rect, Signal,
};

pub use bus::{LayoutBus, ListenerId};
pub use dnd::{classify_zone, drop_highlight, edge_margin, DragSession, DropPreview};
pub use node::{Container, ContentItem, Group, Node, NodeKind, Tab};
pub use resize::{Divider, ResizeController, ResizeEffect, ResizeState};
pub use span::WeightedSpan;

// ──────────────────────────────────────────────
// Workspace
// ──────────────────────────────────────────────

/// Owns the panel tree and every piece of gesture state that touches it.
pub struct Workspace {
    pub(crate) root: Option<Node>,
    next_node_id: NodeId,
    next_item_id: ItemId,
    pub(crate) settings: LayoutSettings,
    viewport: Option<Rect>,
    /// A solve was requested before geometry was known.
    needs_solve: bool,
    pub(crate) resize: ResizeController,
    pub(crate) drag: Option<DragSession>,
    bus: Rc<LayoutBus>,
}

impl Workspace {
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            root: None,
            next_node_id: 1,
            next_item_id: 1,
            settings,
            viewport: None,
            needs_solve: false,
            resize: ResizeController::new(),
            drag: None,
            bus: Rc::new(LayoutBus::new()),
        }
    }

    /// A workspace holding a single group with the given tabs.
    /// Returns the workspace and the group's id, or `None` for no tabs.
    pub fn with_group<I, S>(tabs: I) -> Option<(Self, NodeId)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ws = Self::new(LayoutSettings::default());
        let items: Vec<ContentItem> = tabs
            .into_iter()
            .map(|tab| {
                let id = ws.alloc_item_id();
                ContentItem::new(id, tab)
            })
            .collect();
        if items.is_empty() {
            return None;
        }
        let id = ws.alloc_node_id();
        ws.root = Some(Node::group(id, items, ws.settings.group_config()));
        Some((ws, id))
    }

    /// Build a workspace from an initial tree description.
    pub fn build(spec: &NodeSpec, settings: LayoutSettings) -> Result<Self, LayoutError> {
        let mut ws = Self::new(settings);
        let root = ws.build_node(spec)?;
        ws.root = Some(root);
        Ok(ws)
    }

    fn build_node(&mut self, spec: &NodeSpec) -> Result<Node, LayoutError> {
        match spec {
            NodeSpec::Container {
                axis,
                children,
                weights,
                min_item_size,
                divider_tolerance,
            } => {
                if children.is_empty() {
                    return Err(LayoutError::InvalidSpec("container with no children".into()));
                }
                let mut config = self.settings.container_config();
                if let Some(min) = min_item_size {
                    config.min_item_size = *min;
                }
                if let Some(tolerance) = divider_tolerance {
                    config.divider_tolerance = *tolerance;
                }
                let nodes = children
                    .iter()
                    .map(|child| self.build_node(child))
                    .collect::<Result<Vec<_>, _>>()?;
                let id = self.alloc_node_id();
                let mut node = Node::container(id, *axis, nodes, config);
                if let (Some(weights), Some(c)) = (weights, node.as_container_mut()) {
                    if weights.len() != c.children.len() {
                        return Err(LayoutError::InvalidSpec(format!(
                            "{} weights for {} children",
                            weights.len(),
                            c.children.len()
                        )));
                    }
                    if !weights.iter().copied().all(span::is_valid_weight) {
                        return Err(LayoutError::InvalidSpec(format!(
                            "weights must be positive and finite: {weights:?}"
                        )));
                    }
                    c.weights = weights.clone();
                    span::normalize(&mut c.weights);
                }
                Ok(node)
            }
            NodeSpec::Group {
                items,
                active,
                edge_margin_fraction,
                show_tabs,
                fixed_tabs,
            } => {
                if items.is_empty() {
                    return Err(LayoutError::InvalidSpec("group with no items".into()));
                }
                let mut config = self.settings.group_config();
                if let Some(fraction) = edge_margin_fraction {
                    config.edge_margin_fraction = *fraction;
                }
                if let Some(show) = show_tabs {
                    config.show_tabs = *show;
                }
                if let Some(fixed) = fixed_tabs {
                    config.fixed_tabs = *fixed;
                }
                let items = items.iter().map(|spec| self.make_item(spec)).collect();
                let id = self.alloc_node_id();
                let mut node = Node::group(id, items, config);
                if let (Some(index), Some(g)) = (active, node.as_group_mut()) {
                    g.set_active(*index);
                }
                Ok(node)
            }
        }
    }

    fn make_item(&mut self, spec: &ItemSpec) -> ContentItem {
        let item = ContentItem::new(self.alloc_item_id(), spec.tab.clone());
        match &spec.title {
            Some(title) => item.with_title(title.clone()),
            None => item,
        }
    }

    pub(crate) fn alloc_node_id(&mut self) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        id
    }

    fn alloc_item_id(&mut self) -> ItemId {
        let id = self.next_item_id;
        self.next_item_id += 1;
        id
    }

    // ── Queries ─────────────────────────────────

    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.root.as_ref()?.find(id)
    }

    pub fn group(&self, id: NodeId) -> Option<&Group> {
        self.node(id)?.as_group()
    }

    pub fn container(&self, id: NodeId) -> Option<&Container> {
        self.node(id)?.as_container()
    }

    /// The container directly holding `id`.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        let root = self.root.as_ref()?;
        let path = root.path_to(id)?;
        let (_, parent) = path.split_last()?;
        root.at_path(parent).map(Node::id)
    }

    pub fn group_of(&self, item: ItemId) -> Option<NodeId> {
        self.root.as_ref()?.group_of(item)
    }

    pub fn item(&self, item: ItemId) -> Option<&ContentItem> {
        let group = self.group(self.group_of(item)?)?;
        group.items.iter().find(|i| i.id == item)
    }

    /// Look up an item by its tab id.
    pub fn find_item(&self, tab_id: &str) -> Option<ItemId> {
        self.root.as_ref()?.find_item_by_tab(tab_id)
    }

    /// Ids of every group, in visual (pre-order) order.
    pub fn group_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        if let Some(root) = &self.root {
            root.visit(&mut |n: &Node| {
                if n.as_group().is_some() {
                    ids.push(n.id);
                }
            });
        }
        ids
    }

    /// Solved bounds of every node, pre-order.
    pub fn rects(&self) -> Vec<(NodeId, Rect)> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            solve::collect_rects(root, &mut out);
        }
        out
    }

    pub fn bus(&self) -> Rc<LayoutBus> {
        Rc::clone(&self.bus)
    }

    pub fn subscribe(&self, listener: impl FnMut(Signal) + 'static) -> ListenerId {
        self.bus.subscribe(listener)
    }

    // ── Geometry ────────────────────────────────

    pub fn viewport(&self) -> Option<Rect> {
        self.viewport
    }

    /// The host's available space changed. Weights are re-derived from the
    /// last measured geometry before the tree is solved into the new space.
    /// While a solve is pending the solved rects predate the latest tree
    /// mutation, so the weights are kept as they are.
    pub fn set_viewport(&mut self, viewport: Rect) {
        if self.viewport != Some(viewport) {
            let snapshot_current = !self.needs_solve;
            if let Some(root) = self.root.as_mut().filter(|_| snapshot_current) {
                let measured = solve::measured(root);
                solve::rederive_weights(root, &measured);
            }
            self.viewport = Some(viewport);
        }
        self.relayout(Signal::Resize);
    }

    /// Re-derive weights from geometry measured by the host, then re-solve.
    pub fn remeasure(&mut self, geometry: &dyn Geometry) {
        if let Some(root) = &mut self.root {
            solve::rederive_weights(root, geometry);
        }
        self.relayout(Signal::Layout);
    }

    pub fn needs_solve(&self) -> bool {
        self.needs_solve
    }

    /// Lay the tree out into the viewport. Returns false (and remembers to
    /// retry) while the viewport is unknown or has no area.
    pub fn solve(&mut self) -> bool {
        let Some(root) = &mut self.root else {
            self.needs_solve = false;
            return true;
        };
        let Some(viewport) = self.viewport else {
            self.needs_solve = true;
            return false;
        };
        match solve::solve(root, viewport) {
            Ok(()) => {
                self.needs_solve = false;
                true
            }
            Err(err) => {
                log::debug!("solve deferred: {err}");
                self.needs_solve = true;
                false
            }
        }
    }

    /// Solve, then broadcast. Does nothing while the bus is dispatching so a
    /// listener reacting to a signal can't recurse into another pass.
    pub(crate) fn relayout(&mut self, signal: Signal) -> bool {
        if self.bus.is_dispatching() {
            log::trace!("relayout skipped: bus is dispatching");
            return false;
        }
        let solved = self.solve();
        self.bus.emit(signal);
        solved
    }

    // ── Pointer input (resize) ──────────────────

    /// Feed one pointer event to the divider resize gesture.
    pub fn pointer(&mut self, event: PointerEvent) -> ResizeEffect {
        if self.drag.is_some() {
            return ResizeEffect::Ignored;
        }
        // Ending a gesture needs no geometry; starting or moving one does.
        let needs_geometry = matches!(event, PointerEvent::Move { .. } | PointerEvent::Down { .. });
        if needs_geometry && self.needs_solve && !self.solve() {
            return ResizeEffect::Ignored;
        }
        let effect = self.resize.handle(self.root.as_mut(), event);
        match effect {
            ResizeEffect::Resized => {
                self.relayout(Signal::Layout);
            }
            ResizeEffect::Settled => {
                self.bus.emit(Signal::Layout);
            }
            _ => {}
        }
        effect
    }

    pub fn resize_state(&self) -> ResizeState {
        self.resize.state()
    }

    pub fn divider(&self) -> Option<Divider> {
        self.resize.divider(self.root.as_ref()?)
    }

    // ── Tabs ────────────────────────────────────

    /// Append a new item to `group` and make it active.
    pub fn add_item(&mut self, group: NodeId, spec: &ItemSpec) -> Option<ItemId> {
        self.group(group)?;
        let item = self.make_item(spec);
        let id = item.id;
        self.group_mut(group)?.push(item);
        self.relayout(Signal::Layout);
        Some(id)
    }

    /// The "+" tab: append a new item with the same tab id as the group's
    /// last item. Refused when the group has fixed tabs or no visible strip.
    pub fn add_tab_like_last(&mut self, group: NodeId) -> Option<ItemId> {
        let g = self.group(group)?;
        if !g.offers_add_tab() {
            return None;
        }
        let last = g.items.last()?;
        let spec = ItemSpec {
            tab: last.tab_id.clone(),
            title: last.title.clone(),
        };
        self.add_item(group, &spec)
    }

    /// Make the item at `index` active (clamped). Returns false for an
    /// unknown group.
    pub fn select_item(&mut self, group: NodeId, index: usize) -> bool {
        let Some(g) = self.group_mut(group) else {
            return false;
        };
        g.set_active(index);
        self.bus.emit(Signal::Layout);
        true
    }

    /// Remove an item from the tree. Removing a group's last item excises
    /// the group (and any container left empty).
    pub fn remove_item(&mut self, item: ItemId) -> Option<ContentItem> {
        let removed = self.detach_item(item)?;
        self.resize.reset();
        self.enforce_invariants();
        self.relayout(Signal::Layout);
        Some(removed)
    }

    pub(crate) fn group_mut(&mut self, id: NodeId) -> Option<&mut Group> {
        let root = self.root.as_mut()?;
        let path = root.path_to(id)?;
        root.at_path_mut(&path)?.as_group_mut()
    }

    /// Take `item` out of its group, excising the group when it empties.
    pub(crate) fn detach_item(&mut self, item: ItemId) -> Option<ContentItem> {
        let root = self.root.as_mut()?;
        let group_id = root.group_of(item)?;
        let path = root.path_to(group_id)?;
        let group = root.at_path_mut(&path)?.as_group_mut()?;
        let removed = group.remove(item)?;
        if group.is_empty() {
            self.excise(path);
        }
        Some(removed)
    }

    /// Remove the node at `path` and every ancestor it leaves empty.
    fn excise(&mut self, mut path: Vec<usize>) {
        loop {
            let Some(index) = path.pop() else {
                log::debug!("excised root; workspace is empty");
                self.root = None;
                return;
            };
            let Some(parent) = self
                .root
                .as_mut()
                .and_then(|root| root.at_path_mut(&path))
                .and_then(Node::as_container_mut)
            else {
                return;
            };
            let removed = parent.remove_child(index);
            log::debug!("excised node {}", removed.id);
            if !parent.children.is_empty() {
                return;
            }
        }
    }

    // ── Invariants ──────────────────────────────

    pub fn check_invariants(&self) -> Result<(), LayoutError> {
        match &self.root {
            Some(root) => check_node(root),
            None => Ok(()),
        }
    }

    /// Invariant breaks are bugs: fatal in debug builds, repaired in release.
    pub(crate) fn enforce_invariants(&mut self) {
        let Err(err) = self.check_invariants() else {
            return;
        };
        if cfg!(debug_assertions) {
            panic!("{err}");
        }
        log::error!("{err}; repairing tree");
        if self.root.as_mut().is_some_and(Node::prune) {
            self.root = None;
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(LayoutSettings::default())
    }
}

impl Geometry for Workspace {
    fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.node(node)?.rect
    }
}

fn check_node(node: &Node) -> Result<(), LayoutError> {
    let violation = |detail: String| Err(LayoutError::InvariantViolation(detail));
    match &node.kind {
        NodeKind::Container(c) => {
            if c.children.is_empty() {
                return violation(format!("container {} has no children", node.id));
            }
            if c.weights.len() != c.children.len() {
                return violation(format!(
                    "container {} has {} weights for {} children",
                    node.id,
                    c.weights.len(),
                    c.children.len()
                ));
            }
            if !c.weights.iter().copied().all(span::is_valid_weight) {
                return violation(format!("container {} has weights {:?}", node.id, c.weights));
            }
            c.children.iter().try_for_each(check_node)
        }
        NodeKind::Group(g) => {
            if g.items.is_empty() {
                return violation(format!("group {} is empty", node.id));
            }
            if g.active >= g.items.len() {
                return violation(format!(
                    "group {} active index {} out of {}",
                    node.id,
                    g.active,
                    g.items.len()
                ));
            }
            let active = g.items.iter().filter(|i| i.active).count();
            if active != 1 {
                return violation(format!("group {} has {active} active items", node.id));
            }
            Ok(())
        }
    }
}

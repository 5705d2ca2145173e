use dockyard_core::{Axis, ContainerConfig, GroupConfig, ItemId, NodeId, Rect, Vec2};

use crate::span::{self, WeightedSpan};

// ──────────────────────────────────────────────
// Content items
// ──────────────────────────────────────────────

/// A user-visible payload owned by exactly one group.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub(crate) id: ItemId,
    pub(crate) tab_id: String,
    pub(crate) title: Option<String>,
    pub(crate) active: bool,
}

impl ContentItem {
    pub fn new(id: ItemId, tab_id: impl Into<String>) -> Self {
        Self {
            id,
            tab_id: tab_id.into(),
            title: None,
            active: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn tab_id(&self) -> &str {
        &self.tab_id
    }

    /// Display title, falling back to the tab id.
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.tab_id)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// One entry of a group's tab strip.
#[derive(Debug, Clone, PartialEq)]
pub struct Tab {
    pub item: ItemId,
    pub tab_id: String,
    pub title: String,
    pub active: bool,
}

// ──────────────────────────────────────────────
// Group
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Group {
    pub(crate) items: Vec<ContentItem>,
    pub(crate) active: usize,
    pub(crate) config: GroupConfig,
}

impl Group {
    pub(crate) fn new(items: Vec<ContentItem>, config: GroupConfig) -> Self {
        let mut group = Self {
            items,
            active: 0,
            config,
        };
        group.set_active(0);
        group
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    pub fn active_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.active)
        }
    }

    pub fn active_item(&self) -> Option<&ContentItem> {
        self.items.get(self.active)
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.iter().any(|i| i.id == item)
    }

    /// Make the item at `index` active, clamped into range.
    pub(crate) fn set_active(&mut self, index: usize) {
        self.active = index.min(self.items.len().saturating_sub(1));
        for (i, item) in self.items.iter_mut().enumerate() {
            item.active = i == self.active;
        }
    }

    /// Append an item and make it active.
    pub(crate) fn push(&mut self, item: ContentItem) {
        self.items.push(item);
        self.set_active(self.items.len() - 1);
    }

    /// Remove an item by id. The active index keeps pointing at the same
    /// item when possible, otherwise at its clamped position.
    pub(crate) fn remove(&mut self, item: ItemId) -> Option<ContentItem> {
        let index = self.items.iter().position(|i| i.id == item)?;
        let mut removed = self.items.remove(index);
        removed.active = false;
        let next = if index < self.active {
            self.active - 1
        } else {
            self.active
        };
        self.set_active(next);
        Some(removed)
    }

    /// Whether a tab strip is shown at all.
    pub fn shows_tabs(&self) -> bool {
        self.items.len() > 1 || self.config.show_tabs
    }

    /// Whether the "+" add-tab affordance is offered.
    pub fn offers_add_tab(&self) -> bool {
        !self.config.fixed_tabs && self.shows_tabs()
    }

    /// The tab strip as a renderer would draw it. Empty when hidden.
    pub fn tabs(&self) -> Vec<Tab> {
        if !self.shows_tabs() {
            return Vec::new();
        }
        self.items
            .iter()
            .map(|item| Tab {
                item: item.id,
                tab_id: item.tab_id.clone(),
                title: item.title().to_string(),
                active: item.active,
            })
            .collect()
    }
}

// ──────────────────────────────────────────────
// Container
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Container {
    pub(crate) axis: Axis,
    pub(crate) children: Vec<Node>,
    pub(crate) weights: Vec<f32>,
    pub(crate) config: ContainerConfig,
}

impl Container {
    pub(crate) fn new(axis: Axis, children: Vec<Node>, config: ContainerConfig) -> Self {
        let weights = vec![1.0; children.len()];
        Self {
            axis,
            children,
            weights,
            config,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn span(&self, index: usize) -> Option<WeightedSpan> {
        let weight = *self.weights.get(index)?;
        Some(WeightedSpan::new(weight, self.weights.len()).with_min(self.config.min_item_size))
    }

    /// Weights as a grid template, e.g. `"1.2500fr 0.7500fr"`.
    pub fn template(&self) -> String {
        (0..self.weights.len())
            .filter_map(|i| self.span(i))
            .map(|s| s.fr())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Remove the child at `index`, handing its weight to a neighbour.
    pub(crate) fn remove_child(&mut self, index: usize) -> Node {
        let node = self.children.remove(index);
        span::fold_removed(&mut self.weights, index);
        node
    }

    /// Insert `node` beside the child at `index`, splitting that child's
    /// span in half between the two.
    pub(crate) fn split_child(&mut self, index: usize, node: Node, before: bool) {
        let at = span::split_at(&mut self.weights, index, before);
        self.children.insert(at, node);
    }
}

// ──────────────────────────────────────────────
// Node
// ──────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum NodeKind {
    Container(Container),
    Group(Group),
}

/// A panel tree node. `rect` is the last solved geometry, `None` until the
/// first solve.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) rect: Option<Rect>,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub(crate) fn container(id: NodeId, axis: Axis, children: Vec<Node>, config: ContainerConfig) -> Self {
        Self {
            id,
            rect: None,
            kind: NodeKind::Container(Container::new(axis, children, config)),
        }
    }

    pub(crate) fn group(id: NodeId, items: Vec<ContentItem>, config: GroupConfig) -> Self {
        Self {
            id,
            rect: None,
            kind: NodeKind::Group(Group::new(items, config)),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn as_container(&self) -> Option<&Container> {
        match &self.kind {
            NodeKind::Container(c) => Some(c),
            NodeKind::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            NodeKind::Group(g) => Some(g),
            NodeKind::Container(_) => None,
        }
    }

    pub(crate) fn as_container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.kind {
            NodeKind::Container(c) => Some(c),
            NodeKind::Group(_) => None,
        }
    }

    pub(crate) fn as_group_mut(&mut self) -> Option<&mut Group> {
        match &mut self.kind {
            NodeKind::Group(g) => Some(g),
            NodeKind::Container(_) => None,
        }
    }

    /// Child-index path from this node to `target`, if present.
    pub(crate) fn path_to(&self, target: NodeId) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        if self.find_path(target, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn find_path(&self, target: NodeId, path: &mut Vec<usize>) -> bool {
        if self.id == target {
            return true;
        }
        if let NodeKind::Container(c) = &self.kind {
            for (i, child) in c.children.iter().enumerate() {
                path.push(i);
                if child.find_path(target, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    pub(crate) fn at_path(&self, path: &[usize]) -> Option<&Node> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => self.as_container()?.children.get(i)?.at_path(rest),
        }
    }

    pub(crate) fn at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        match path.split_first() {
            None => Some(self),
            Some((&i, rest)) => self
                .as_container_mut()?
                .children
                .get_mut(i)?
                .at_path_mut(rest),
        }
    }

    pub(crate) fn find(&self, target: NodeId) -> Option<&Node> {
        if self.id == target {
            return Some(self);
        }
        self.as_container()?
            .children
            .iter()
            .find_map(|child| child.find(target))
    }

    /// The group holding `item`.
    pub(crate) fn group_of(&self, item: ItemId) -> Option<NodeId> {
        match &self.kind {
            NodeKind::Group(g) if g.contains(item) => Some(self.id),
            NodeKind::Group(_) => None,
            NodeKind::Container(c) => c.children.iter().find_map(|child| child.group_of(item)),
        }
    }

    pub(crate) fn find_item_by_tab(&self, tab_id: &str) -> Option<ItemId> {
        match &self.kind {
            NodeKind::Group(g) => g.items.iter().find(|i| i.tab_id == tab_id).map(|i| i.id),
            NodeKind::Container(c) => c
                .children
                .iter()
                .find_map(|child| child.find_item_by_tab(tab_id)),
        }
    }

    /// The deepest group whose solved rect contains `point`.
    pub(crate) fn group_at(&self, point: Vec2) -> Option<NodeId> {
        let rect = self.rect?;
        if !rect.contains(point) {
            return None;
        }
        match &self.kind {
            NodeKind::Group(_) => Some(self.id),
            NodeKind::Container(c) => c.children.iter().find_map(|child| child.group_at(point)),
        }
    }

    /// Visit every node in pre-order.
    pub(crate) fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        if let NodeKind::Container(c) = &self.kind {
            for child in &c.children {
                child.visit(f);
            }
        }
    }

    /// Drop empty groups and containers beneath this node and fix up weights
    /// and active indices. Returns `true` if this node itself is now empty
    /// and must be removed by its parent.
    pub(crate) fn prune(&mut self) -> bool {
        match &mut self.kind {
            NodeKind::Group(g) => {
                let active = g.active;
                g.set_active(active);
                g.items.is_empty()
            }
            NodeKind::Container(c) => {
                if c.weights.len() != c.children.len() {
                    c.weights = vec![1.0; c.children.len()];
                }
                let mut i = 0;
                while i < c.children.len() {
                    if c.children[i].prune() {
                        c.remove_child(i);
                    } else {
                        i += 1;
                    }
                }
                span::normalize(&mut c.weights);
                c.children.is_empty()
            }
        }
    }
}

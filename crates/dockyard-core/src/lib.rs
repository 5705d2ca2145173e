use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ──────────────────────────────────────────────
// Geometry
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// A rect with no area has not been laid out yet.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

// ──────────────────────────────────────────────
// Identity
// ──────────────────────────────────────────────

/// Identifies a panel node (container or group). Never reused.
pub type NodeId = u64;

/// Identifies a content item. Never reused.
pub type ItemId = u64;

// ──────────────────────────────────────────────
// Axis
// ──────────────────────────────────────────────

/// The direction a container divides its space in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Children are stacked top to bottom; boundaries are horizontal lines.
    Row,
    /// Children sit side by side; boundaries are vertical lines.
    Column,
}

impl Axis {
    /// Extent of `rect` along this axis (height for rows, width for columns).
    pub fn extent(self, rect: Rect) -> f32 {
        match self {
            Axis::Row => rect.height,
            Axis::Column => rect.width,
        }
    }

    /// Start coordinate of `rect` along this axis.
    pub fn start(self, rect: Rect) -> f32 {
        match self {
            Axis::Row => rect.y,
            Axis::Column => rect.x,
        }
    }

    /// Coordinate of `point` along this axis.
    pub fn coord(self, point: Vec2) -> f32 {
        match self {
            Axis::Row => point.y,
            Axis::Column => point.x,
        }
    }

    /// Coordinate of `point` across this axis.
    pub fn cross_coord(self, point: Vec2) -> f32 {
        match self {
            Axis::Row => point.x,
            Axis::Column => point.y,
        }
    }

    /// `(start, end)` of `rect` across this axis.
    pub fn cross_range(self, rect: Rect) -> (f32, f32) {
        match self {
            Axis::Row => (rect.x, rect.right()),
            Axis::Column => (rect.y, rect.bottom()),
        }
    }

    /// Cut a slice of `rect` starting `offset` pixels in along this axis.
    pub fn slice(self, rect: Rect, offset: f32, span: f32) -> Rect {
        match self {
            Axis::Row => Rect::new(rect.x, rect.y + offset, rect.width, span),
            Axis::Column => Rect::new(rect.x + offset, rect.y, span, rect.height),
        }
    }
}

// ──────────────────────────────────────────────
// Drag & drop
// ──────────────────────────────────────────────

/// Payload key that marks a drag as a layout (tab) drag.
pub const TAB_PAYLOAD_KEY: &str = "tab";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropZone {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl DropZone {
    /// The axis a directional drop splits along, `None` for center.
    pub fn split_axis(self) -> Option<Axis> {
        match self {
            DropZone::Top | DropZone::Bottom => Some(Axis::Row),
            DropZone::Left | DropZone::Right => Some(Axis::Column),
            DropZone::Center => None,
        }
    }

    /// Whether the new node goes before (above/left of) the target.
    pub fn inserts_before(self) -> bool {
        matches!(self, DropZone::Top | DropZone::Left)
    }
}

/// Data carried by a drag gesture: a key and the dragged item's tab id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub key: String,
    pub value: String,
}

impl DragPayload {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Payload for dragging the item with the given tab id.
    pub fn tab(tab_id: impl Into<String>) -> Self {
        Self::new(TAB_PAYLOAD_KEY, tab_id)
    }

    pub fn is_layout_drag(&self) -> bool {
        self.key == TAB_PAYLOAD_KEY && !self.value.is_empty()
    }
}

// ──────────────────────────────────────────────
// Input & signals
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { position: Vec2 },
    Down { position: Vec2 },
    Up { position: Vec2 },
    Cancel,
}

/// Advisory layout notifications. No payload: listeners re-check their own state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Structural or settled-size change; collaborators should re-render.
    Layout,
    /// Available viewport size changed; collaborators should re-measure.
    Resize,
}

// ──────────────────────────────────────────────
// Trait: Geometry
// ──────────────────────────────────────────────

/// Pixel bounds of nodes as currently measured.
/// `None` means the node has not been measured yet.
pub trait Geometry {
    fn bounds(&self, node: NodeId) -> Option<Rect>;
}

impl Geometry for HashMap<NodeId, Rect> {
    fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.get(&node).copied()
    }
}

// ──────────────────────────────────────────────
// Errors
// ──────────────────────────────────────────────

/// Why a drop was rejected without touching the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropRejection {
    NoSession,
    UnknownPayload(String),
    NoTarget,
    SameGroup,
    LastItemOntoItself,
    /// The dragged item left its source group after the drag started.
    SourceChanged,
}

impl fmt::Display for DropRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSession => write!(f, "no layout drag in progress"),
            Self::UnknownPayload(value) => write!(f, "payload {value:?} names no live item"),
            Self::NoTarget => write!(f, "drop position is not over a group"),
            Self::SameGroup => write!(f, "item is already in the target group"),
            Self::LastItemOntoItself => {
                write!(f, "cannot split a group's only item off itself")
            }
            Self::SourceChanged => write!(f, "dragged item left its source group"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Bounds are not measured yet; the operation is deferred.
    GeometryUnavailable,
    InvalidDrop(DropRejection),
    InvariantViolation(String),
    InvalidSpec(String),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GeometryUnavailable => write!(f, "geometry not measured yet"),
            Self::InvalidDrop(reason) => write!(f, "invalid drop: {reason}"),
            Self::InvariantViolation(detail) => {
                write!(f, "layout invariant violated: {detail}")
            }
            Self::InvalidSpec(detail) => write!(f, "invalid layout description: {detail}"),
        }
    }
}

impl std::error::Error for LayoutError {}

// ──────────────────────────────────────────────
// Configuration
// ──────────────────────────────────────────────

/// Workspace-wide defaults applied to every node unless overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Smallest span (px) a resize may leave on either side of a divider.
    pub min_item_size: f32,
    /// Distance (px) from a boundary within which the divider is grabbed.
    pub divider_tolerance: f32,
    /// Edge drop margin as a fraction of the group's shorter side.
    pub edge_margin_fraction: f32,
    /// Show the tab strip even when a group holds a single item.
    pub show_tabs: bool,
    /// Hide the "+" add-tab affordance.
    pub fixed_tabs: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            min_item_size: 10.0,
            divider_tolerance: 3.0,
            edge_margin_fraction: 0.125,
            show_tabs: false,
            fixed_tabs: false,
        }
    }
}

impl LayoutSettings {
    pub fn container_config(&self) -> ContainerConfig {
        ContainerConfig {
            min_item_size: self.min_item_size,
            divider_tolerance: self.divider_tolerance,
        }
    }

    pub fn group_config(&self) -> GroupConfig {
        GroupConfig {
            edge_margin_fraction: self.edge_margin_fraction,
            show_tabs: self.show_tabs,
            fixed_tabs: self.fixed_tabs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerConfig {
    pub min_item_size: f32,
    pub divider_tolerance: f32,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        LayoutSettings::default().container_config()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupConfig {
    pub edge_margin_fraction: f32,
    pub show_tabs: bool,
    pub fixed_tabs: bool,
}

impl Default for GroupConfig {
    fn default() -> Self {
        LayoutSettings::default().group_config()
    }
}

// ──────────────────────────────────────────────
// Initial tree description
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub tab: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl ItemSpec {
    pub fn new(tab: impl Into<String>) -> Self {
        Self {
            tab: tab.into(),
            title: None,
        }
    }
}

/// Declarative description of an initial panel tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSpec {
    Container {
        axis: Axis,
        children: Vec<NodeSpec>,
        #[serde(default)]
        weights: Option<Vec<f32>>,
        #[serde(default)]
        min_item_size: Option<f32>,
        #[serde(default)]
        divider_tolerance: Option<f32>,
    },
    Group {
        items: Vec<ItemSpec>,
        #[serde(default)]
        active: Option<usize>,
        #[serde(default)]
        edge_margin_fraction: Option<f32>,
        #[serde(default)]
        show_tabs: Option<bool>,
        #[serde(default)]
        fixed_tabs: Option<bool>,
    },
}

impl NodeSpec {
    pub fn container(axis: Axis, children: Vec<NodeSpec>) -> Self {
        NodeSpec::Container {
            axis,
            children,
            weights: None,
            min_item_size: None,
            divider_tolerance: None,
        }
    }

    pub fn group<I, S>(tabs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NodeSpec::Group {
            items: tabs.into_iter().map(ItemSpec::new).collect(),
            active: None,
            edge_margin_fraction: None,
            show_tabs: None,
            fixed_tabs: None,
        }
    }
}

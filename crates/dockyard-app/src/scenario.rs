// Scenario files: an initial tree, a viewport and a list of input steps to
// replay against it.

use std::fmt;
use std::path::Path;

use dockyard_core::{
    DragPayload, ItemSpec, LayoutError, LayoutSettings, NodeSpec, PointerEvent, Rect, Size, Vec2,
    TAB_PAYLOAD_KEY,
};
use dockyard_layout::Workspace;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub viewport: Size,
    pub layout: NodeSpec,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn workspace(&self, settings: LayoutSettings) -> Result<Workspace, LayoutError> {
        let mut ws = Workspace::build(&self.layout, settings)?;
        ws.set_viewport(Rect::from_size(self.viewport));
        Ok(ws)
    }
}

/// One input event. Items are addressed by tab id.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Move { x: f32, y: f32 },
    Down { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Cancel,
    Viewport { width: f32, height: f32 },
    DragStart {
        tab: String,
        #[serde(default = "default_payload_key")]
        key: String,
    },
    DragOver { x: f32, y: f32 },
    DragLeave,
    Drop { x: f32, y: f32 },
    DragEnd,
    Select { tab: String },
    Add {
        beside: String,
        tab: String,
        #[serde(default)]
        title: Option<String>,
    },
    AddTab { beside: String },
    Remove { tab: String },
}

fn default_payload_key() -> String {
    TAB_PAYLOAD_KEY.to_string()
}

#[derive(Debug)]
pub enum ScenarioError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Layout(LayoutError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read scenario: {e}"),
            Self::Parse(e) => write!(f, "cannot parse scenario: {e}"),
            Self::Layout(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Layout(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<LayoutError> for ScenarioError {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

pub fn load_scenario(path: &Path) -> Result<Scenario, ScenarioError> {
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Apply one step and describe what it did.
pub fn run_step(ws: &mut Workspace, step: &Step) -> String {
    let at = Vec2::new;
    match step {
        Step::Move { x, y } => pointer(ws, PointerEvent::Move { position: at(*x, *y) }),
        Step::Down { x, y } => pointer(ws, PointerEvent::Down { position: at(*x, *y) }),
        Step::Up { x, y } => pointer(ws, PointerEvent::Up { position: at(*x, *y) }),
        Step::Cancel => pointer(ws, PointerEvent::Cancel),
        Step::Viewport { width, height } => {
            ws.set_viewport(Rect::new(0.0, 0.0, *width, *height));
            if ws.needs_solve() {
                "deferred".to_string()
            } else {
                "solved".to_string()
            }
        }
        Step::DragStart { tab, key } => {
            if ws.begin_drag(&DragPayload::new(key.as_str(), tab.as_str())) {
                "drag started".to_string()
            } else {
                "ignored".to_string()
            }
        }
        Step::DragOver { x, y } => match ws.drag_over(at(*x, *y)) {
            Some(preview) => format!("{:?} of group {}", preview.zone, preview.group),
            None => "no target".to_string(),
        },
        Step::DragLeave => {
            ws.drag_leave();
            "left".to_string()
        }
        Step::Drop { x, y } => match ws.drop_at(at(*x, *y)) {
            Ok(()) => "dropped".to_string(),
            Err(e) => format!("rejected: {e}"),
        },
        Step::DragEnd => {
            ws.end_drag();
            "drag ended".to_string()
        }
        Step::Select { tab } => select(ws, tab),
        Step::Add { beside, tab, title } => {
            let Some(group) = group_of_tab(ws, beside) else {
                return unknown(beside);
            };
            let spec = ItemSpec {
                tab: tab.clone(),
                title: title.clone(),
            };
            match ws.add_item(group, &spec) {
                Some(id) => format!("added item {id}"),
                None => unknown(beside),
            }
        }
        Step::AddTab { beside } => {
            let Some(group) = group_of_tab(ws, beside) else {
                return unknown(beside);
            };
            match ws.add_tab_like_last(group) {
                Some(id) => format!("added item {id}"),
                None => "add-tab not offered".to_string(),
            }
        }
        Step::Remove { tab } => {
            let removed = ws.find_item(tab).and_then(|item| ws.remove_item(item));
            match removed {
                Some(item) => format!("removed item {}", item.id()),
                None => unknown(tab),
            }
        }
    }
}

fn pointer(ws: &mut Workspace, event: PointerEvent) -> String {
    format!("{:?}", ws.pointer(event))
}

fn select(ws: &mut Workspace, tab: &str) -> String {
    let found = ws.find_item(tab).and_then(|item| {
        let group = ws.group_of(item)?;
        let index = ws.group(group)?.items().iter().position(|i| i.id() == item)?;
        Some((group, index))
    });
    let Some((group, index)) = found else {
        return unknown(tab);
    };
    if ws.select_item(group, index) {
        format!("selected tab {index} of group {group}")
    } else {
        unknown(tab)
    }
}

fn group_of_tab(ws: &Workspace, tab: &str) -> Option<dockyard_core::NodeId> {
    ws.group_of(ws.find_item(tab)?)
}

fn unknown(tab: &str) -> String {
    format!("unknown tab {tab:?}")
}

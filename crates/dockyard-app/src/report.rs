// Plain-text rendering of the panel tree and signal tallies.

use std::fmt::Write;

use dockyard_core::{Rect, Signal};
use dockyard_layout::{Node, NodeKind, Workspace};

use crate::settings::ReportSettings;

/// Signals seen on the bus while a scenario ran.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SignalCounts {
    pub layout: u64,
    pub resize: u64,
}

impl SignalCounts {
    pub fn record(&mut self, signal: Signal) {
        match signal {
            Signal::Layout => self.layout += 1,
            Signal::Resize => self.resize += 1,
        }
    }
}

pub fn render(ws: &Workspace, opts: &ReportSettings) -> String {
    let mut out = String::new();
    match ws.root() {
        Some(root) => render_node(&mut out, root, 0, opts),
        None => out.push_str("(empty)\n"),
    }
    out
}

fn render_node(out: &mut String, node: &Node, depth: usize, opts: &ReportSettings) {
    let indent = "  ".repeat(depth);
    let rect = node.rect().map(format_rect).unwrap_or_else(|| "unsolved".to_string());
    match node.kind() {
        NodeKind::Container(c) => {
            let axis = format!("{:?}", c.axis()).to_lowercase();
            let _ = write!(out, "{indent}container {} {axis} {rect}", node.id());
            if opts.templates {
                let _ = write!(out, " [{}]", c.template());
            }
            out.push('\n');
            for child in c.children() {
                render_node(out, child, depth + 1, opts);
            }
        }
        NodeKind::Group(g) => {
            let _ = write!(out, "{indent}group {} {rect}", node.id());
            if opts.tabs {
                let tabs = g.tabs();
                if tabs.is_empty() {
                    if let Some(item) = g.active_item() {
                        let _ = write!(out, " {}", item.title());
                    }
                } else {
                    let strip: Vec<String> = tabs
                        .iter()
                        .map(|t| if t.active { format!("*{}", t.title) } else { t.title.clone() })
                        .collect();
                    let _ = write!(out, " | {} |", strip.join(" | "));
                    if g.offers_add_tab() {
                        out.push_str(" +");
                    }
                }
            }
            out.push('\n');
        }
    }
}

fn format_rect(rect: Rect) -> String {
    format!("{}x{}@{},{}", rect.width, rect.height, rect.x, rect.y)
}

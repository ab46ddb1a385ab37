//! Graph rendering
//!
//! Turns a [`Layout`](crate::layout::Layout) into drawable boxes and edges and
//! reports two events upward: the root moving on the canvas, and a node
//! being tapped.

use std::collections::HashMap;
use std::fmt::Write;

use crate::layout::{layout, LayoutConfig};
use crate::node::Node;

const FILL: &str = "lightblue";
const STROKE: &str = "gray";
const SELECTED_FILL: &str = "#ffe0b2";
const SELECTED_STROKE: &str = "orange";
const FONT_SIZE: u32 = 12;

/// One node's box; `(x, y)` is the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBox {
    pub key: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub selected: bool,
}

impl NodeBox {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.size && y >= self.y && y <= self.y + self.size
    }
}

/// Line from the bottom edge of a parent box to the top edge of a child box
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Notifications emitted by the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// The root's centre differs from the previous render pass
    RootMoved { x: f64, y: f64 },
    /// A node box was tapped
    NodeTapped(Node),
}

/// Everything needed to draw one pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub boxes: Vec<NodeBox>,
    pub edges: Vec<Edge>,
    /// Events raised by this pass
    pub events: Vec<GraphEvent>,
}

impl Frame {
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Topmost box under the point
    pub fn hit(&self, x: f64, y: f64) -> Option<&NodeBox> {
        self.boxes.iter().rev().find(|b| b.contains(x, y))
    }

    /// Render as a standalone SVG document
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );
        for edge in &self.edges {
            let _ = writeln!(
                svg,
                r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}"/>"#,
                edge.x1, edge.y1, edge.x2, edge.y2, STROKE
            );
        }
        for b in &self.boxes {
            let (fill, stroke, stroke_width) = if b.selected {
                (SELECTED_FILL, SELECTED_STROKE, 3)
            } else {
                (FILL, STROKE, 1)
            };
            let _ = writeln!(svg, r#"  <g data-key="{}">"#, escape_xml(&b.key));
            let _ = writeln!(
                svg,
                r#"    <rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                b.x, b.y, b.size, b.size, fill, stroke, stroke_width
            );
            let _ = writeln!(
                svg,
                r#"    <text x="{}" y="{}" text-anchor="middle" dy="5" font-size="{}" fill="black">{}</text>"#,
                b.x + b.size / 2.0,
                b.y + b.size / 2.0,
                FONT_SIZE,
                escape_xml(&b.label)
            );
            svg.push_str("  </g>\n");
        }
        svg.push_str("</svg>\n");
        svg
    }
}

/// Stateful renderer: remembers the selection and the last root position
#[derive(Debug, Clone, Default)]
pub struct GraphRenderer {
    config: LayoutConfig,
    selected: Option<String>,
    last_root: Option<(f64, f64)>,
}

impl GraphRenderer {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            selected: None,
            last_root: None,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, key: Option<String>) {
        self.selected = key;
    }

    /// Lay out and draw `tree`; an absent tree draws nothing
    pub fn render(&mut self, tree: Option<&Node>) -> Frame {
        let layout = layout(tree, &self.config);
        if layout.is_empty() {
            self.last_root = None;
            return Frame::default();
        }

        let half = self.config.node_size / 2.0;
        let centres: HashMap<&str, (f64, f64)> = layout
            .placements
            .iter()
            .map(|p| (p.node.key.as_str(), (p.x, p.y)))
            .collect();

        let boxes = layout
            .placements
            .iter()
            .map(|p| NodeBox {
                key: p.node.key.clone(),
                label: p.node.name.clone(),
                x: p.x - half,
                y: p.y - half,
                size: self.config.node_size,
                selected: self.selected.as_deref() == Some(p.node.key.as_str()),
            })
            .collect();

        let mut edges = Vec::new();
        for parent in &layout.placements {
            for child in &parent.node.children {
                if let Some(&(cx, cy)) = centres.get(child.key.as_str()) {
                    edges.push(Edge {
                        from: parent.node.key.clone(),
                        to: child.key.clone(),
                        x1: parent.x,
                        y1: parent.y + half,
                        x2: cx,
                        y2: cy - half,
                    });
                }
            }
        }

        let mut events = Vec::new();
        if let Some((x, y)) = layout.root_position() {
            if self.last_root != Some((x, y)) {
                self.last_root = Some((x, y));
                events.push(GraphEvent::RootMoved { x, y });
            }
        }

        Frame {
            width: layout.width,
            height: layout.height,
            boxes,
            edges,
            events,
        }
    }

    /// Resolve a tap at canvas point `(x, y)`; the tapped node becomes selected
    pub fn tap(&mut self, tree: Option<&Node>, frame: &Frame, x: f64, y: f64) -> Option<GraphEvent> {
        let hit = frame.hit(x, y)?;
        let node = tree?.find(&hit.key)?;
        log::debug!("Tapped node {}", node.key);
        self.selected = Some(node.key.clone());
        Some(GraphEvent::NodeTapped(node.clone()))
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::root()
            .with_child(Node::new("a", "A").with_child(Node::new("a1", "A1")))
            .with_child(Node::new("b", "B"))
    }

    #[test]
    fn test_absent_tree_renders_nothing() {
        let mut renderer = GraphRenderer::default();
        let frame = renderer.render(None);
        assert!(frame.is_empty());
        assert!(frame.events.is_empty());
    }

    #[test]
    fn test_boxes_and_edges() {
        let tree = sample();
        let mut renderer = GraphRenderer::default();
        let frame = renderer.render(Some(&tree));

        assert_eq!(frame.boxes.len(), 4);
        assert_eq!(frame.edges.len(), 3);

        let root_box = &frame.boxes[0];
        assert_eq!((root_box.x, root_box.y), (475.0, 25.0));

        let edge = frame.edges.iter().find(|e| e.to == "a1").unwrap();
        assert_eq!(edge.from, "a");
        assert_eq!(edge.y1, 150.0 + 25.0);
        assert_eq!(edge.y2, 250.0 - 25.0);
        assert_eq!(edge.x2, 500.0);
    }

    #[test]
    fn test_root_moved_fires_only_on_position_change() {
        let mut tree = sample();
        let mut renderer = GraphRenderer::default();

        let first = renderer.render(Some(&tree));
        assert_eq!(
            first.events,
            vec![GraphEvent::RootMoved { x: 500.0, y: 50.0 }]
        );

        tree.name = "Renamed".into();
        tree.find_mut("b").unwrap().children.push(Node::new("b1", "B1"));
        let second = renderer.render(Some(&tree));
        assert!(second.events.is_empty());

        for i in 0..12 {
            tree.children.push(Node::new(format!("w{i}"), "W"));
        }
        let third = renderer.render(Some(&tree));
        assert_eq!(third.events.len(), 1);
    }

    #[test]
    fn test_root_moved_fires_again_after_empty_pass() {
        let tree = sample();
        let mut renderer = GraphRenderer::default();
        renderer.render(Some(&tree));
        renderer.render(None);
        assert_eq!(renderer.render(Some(&tree)).events.len(), 1);
    }

    #[test]
    fn test_selection_highlight() {
        let tree = sample();
        let mut renderer = GraphRenderer::default();
        renderer.select(Some("b".into()));
        let frame = renderer.render(Some(&tree));

        let selected: Vec<&str> = frame
            .boxes
            .iter()
            .filter(|b| b.selected)
            .map(|b| b.key.as_str())
            .collect();
        assert_eq!(selected, vec!["b"]);
        assert!(frame.to_svg().contains(SELECTED_STROKE));
    }

    #[test]
    fn test_tap_selects_and_reports_node() {
        let tree = sample();
        let mut renderer = GraphRenderer::default();
        let frame = renderer.render(Some(&tree));

        let event = renderer.tap(Some(&tree), &frame, 500.0, 50.0);
        assert_eq!(event, Some(GraphEvent::NodeTapped(tree.clone())));
        assert_eq!(renderer.selected(), Some("root"));

        assert!(renderer.tap(Some(&tree), &frame, 5.0, 5.0).is_none());
    }

    #[test]
    fn test_svg_escapes_labels() {
        let tree = Node::new("root", "Tom & <Jerry>");
        let mut renderer = GraphRenderer::default();
        let svg = renderer.render(Some(&tree)).to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Tom &amp; &lt;Jerry&gt;"));
        assert!(svg.contains(r#"width="1000""#));
    }
}

//! Level-bucket tree layout
//!
//! Nodes are bucketed purely by depth (not by parent) and every level divides
//! the canvas width evenly among its nodes. Unrelated nodes at the same depth
//! therefore interleave horizontally; this is a canvas overview, not a
//! family-tree layout.

use serde::{Deserialize, Serialize};

use crate::node::Node;

/// Fixed geometry of the canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Side length of the square drawn for each node
    pub node_size: f64,
    /// Distance between neighbouring centres on the widest level
    pub horizontal_spacing: f64,
    /// Distance between consecutive levels
    pub vertical_spacing: f64,
    /// Y of the root's centre
    pub top_margin: f64,
    pub min_width: f64,
    pub min_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_size: 50.0,
            horizontal_spacing: 100.0,
            vertical_spacing: 100.0,
            top_margin: 50.0,
            min_width: 1000.0,
            min_height: 1000.0,
        }
    }
}

/// Position of one node; `(x, y)` is the centre of its box
#[derive(Debug, Clone, PartialEq)]
pub struct Placement<'a> {
    pub node: &'a Node,
    /// Depth from the root (root = 0)
    pub level: usize,
    /// 1-based ordinal among the nodes of the same level, in traversal order
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

/// Placements for a whole tree plus the canvas size they need
#[derive(Debug, Clone, PartialEq)]
pub struct Layout<'a> {
    /// Pre-order: the root comes first
    pub placements: Vec<Placement<'a>>,
    pub width: f64,
    pub height: f64,
}

impl<'a> Layout<'a> {
    pub fn empty() -> Self {
        Self {
            placements: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn placement(&self, key: &str) -> Option<&Placement<'a>> {
        self.placements.iter().find(|p| p.node.key == key)
    }

    pub fn position_of(&self, key: &str) -> Option<(f64, f64)> {
        self.placement(key).map(|p| (p.x, p.y))
    }

    pub fn root_position(&self) -> Option<(f64, f64)> {
        self.placements.first().map(|p| (p.x, p.y))
    }

    pub fn level_count(&self) -> usize {
        self.placements.iter().map(|p| p.level + 1).max().unwrap_or(0)
    }
}

/// Lay out `tree`; an absent tree yields an empty layout
pub fn layout<'a>(tree: Option<&'a Node>, config: &LayoutConfig) -> Layout<'a> {
    let Some(root) = tree else {
        return Layout::empty();
    };

    let mut entries: Vec<(&'a Node, usize, usize)> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    bucket(root, 0, &mut entries, &mut counts);

    let widest = counts.iter().copied().max().unwrap_or(1);
    let levels = counts.len();
    let width = config
        .min_width
        .max((widest + 1) as f64 * config.horizontal_spacing);
    let height = config.min_height.max(
        2.0 * config.top_margin
            + levels.saturating_sub(1) as f64 * config.vertical_spacing
            + config.node_size,
    );

    let placements = entries
        .into_iter()
        .map(|(node, level, index)| {
            let total = counts[level];
            Placement {
                node,
                level,
                index,
                x: width / (total + 1) as f64 * index as f64,
                y: level as f64 * config.vertical_spacing + config.top_margin,
            }
        })
        .collect();

    Layout {
        placements,
        width,
        height,
    }
}

/// Depth-first walk recording each node with its level and 1-based ordinal
fn bucket<'a>(
    node: &'a Node,
    level: usize,
    entries: &mut Vec<(&'a Node, usize, usize)>,
    counts: &mut Vec<usize>,
) {
    if counts.len() <= level {
        counts.push(0);
    }
    counts[level] += 1;
    entries.push((node, level, counts[level]));

    for child in &node.children {
        bucket(child, level + 1, entries, counts);
    }
}

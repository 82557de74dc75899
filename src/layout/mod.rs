pub mod squarify;

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{Result, TreemapError};
use crate::tree::arena::{NodeId, NodeTree};
use self::squarify::{squarify, Bounds, PHI};

/// A positioned leaf rectangle in the treemap layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeafRect {
    pub node: NodeId,
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub depth: u16,
}

impl LeafRect {
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn is_degenerate(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Overlapping area with another rect (0 when they only touch).
    pub fn intersection_area(&self, other: &LeafRect) -> f64 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}

/// The full layout result (leaf rects + fast lookup).
#[derive(Debug, Clone, Default)]
pub struct Layout {
    /// One rect per leaf, in dataset (pre-order) order
    pub rects: Vec<LeafRect>,
    /// node → index into `rects`
    pub node_to_rect: HashMap<NodeId, usize>,
}

impl Layout {
    pub fn get(&self, node: NodeId) -> Option<&LeafRect> {
        self.node_to_rect.get(&node).map(|&i| &self.rects[i])
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn total_area(&self) -> f64 {
        self.rects.iter().map(LeafRect::area).sum()
    }
}

/// Configuration for treemap layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Target aspect ratio for squarified rows (d3 uses the golden ratio)
    pub ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { ratio: PHI }
    }
}

/// Lay out every leaf of `tree` inside a `width` x `height` box.
///
/// Children are tiled in input order with [`squarify`]. Zero-weight
/// subtrees stay in the result as zero-area rects.
pub fn compute_layout(
    tree: &NodeTree,
    width: f64,
    height: f64,
    config: &LayoutConfig,
) -> Result<Layout> {
    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        return Err(TreemapError::InvalidLayoutBounds { width, height });
    }

    let ratio = if config.ratio.is_finite() && config.ratio >= 1.0 {
        config.ratio
    } else {
        tracing::warn!(
            "Layout ratio {} is not a finite value >= 1, using the golden ratio",
            config.ratio
        );
        PHI
    };

    let mut layout = Layout::default();
    let root = tree.root;
    tracing::debug!(
        "Laying out '{}' (weight={}) in {:.0}x{:.0}",
        tree.get(root).name,
        tree.get(root).weight,
        width,
        height
    );

    // Explicit stack of (node, bounds); children are pushed in reverse so
    // leaves come out in pre-order.
    let mut stack = vec![(root, Bounds::new(0.0, 0.0, width, height))];
    while let Some((id, bounds)) = stack.pop() {
        let node = tree.get(id);
        if node.is_leaf {
            let rect = LeafRect {
                node: id,
                x0: bounds.x0,
                y0: bounds.y0,
                x1: bounds.x1,
                y1: bounds.y1,
                depth: node.depth,
            };
            layout.node_to_rect.insert(id, layout.rects.len());
            layout.rects.push(rect);
            continue;
        }

        let children: Vec<NodeId> = tree.children(id).collect();
        if children.is_empty() {
            continue;
        }
        let weights: Vec<f64> = children.iter().map(|&c| tree.get(c).weight).collect();
        let tiles = squarify(&weights, bounds, ratio);
        for (&child, tile) in children.iter().zip(tiles).rev() {
            stack.push((child, tile));
        }
    }

    let degenerate = layout.rects.iter().filter(|r| r.is_degenerate()).count();
    tracing::info!(
        "Layout computed: {} leaf rects ({} zero-area) in {:.0}x{:.0}",
        layout.rects.len(),
        degenerate,
        width,
        height
    );

    Ok(layout)
}

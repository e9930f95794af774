//! Tidy tree layout for the collapsible genealogy tree.
//!
//! A Reingold-Tilford style layout over the hierarchy forest, wrapped
//! under a synthetic super-root. Each subtree keeps a contour (the
//! leftmost and rightmost breadth per level); siblings are pushed apart
//! until their contours clear the required separation, and parents sit
//! centred over their first and last child.
//!
//! # Algorithm Overview
//!
//! 1. **Arena build (pre-order):** flatten the visible forest into an
//!    arena; children always have larger indices than their parent.
//! 2. **Contour merge (reverse order):** visiting the arena backwards is
//!    a post-order walk, so every child's contour is ready when its
//!    parent merges them.
//! 3. **Accumulate (forward order):** turn parent-relative offsets into
//!    absolute breadth positions.
//! 4. **Coordinate transform:** scale by the node and level spacing,
//!    centre the breadth extent on the canvas and inset the depth.
//!
//! Tree nodes are identified by their child-index path (`"0/2/1"`),
//! because a person may occur several times in the forest.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::{Gender, HierarchyNode};

/// Axis along which tree depth grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Depth along x, siblings spread along y.
    #[default]
    Horizontal,
    /// Depth along y, siblings spread along x.
    Vertical,
}

/// Configuration for the tidy tree layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TreeLayoutConfig {
    /// Node spacing is `node_spacing_scale / sqrt(n)`, clamped.
    pub node_spacing_scale: f32,
    pub min_node_spacing: f32,
    pub max_node_spacing: f32,
    /// Level spacing is `level_spacing_scale / height`, clamped.
    pub level_spacing_scale: f32,
    pub min_level_spacing: f32,
    pub max_level_spacing: f32,
    /// Separation between siblings, in node spacings.
    pub sibling_separation: f32,
    /// Separation between nodes of different parents, in node spacings.
    pub subtree_separation: f32,
    /// Offset of the shallowest level from the canvas edge.
    pub depth_inset: f32,
    pub orientation: Orientation,
    /// Nodes deeper than this start collapsed. The super-root is depth 0.
    pub collapse_depth: u32,
    /// Label of the synthetic super-root.
    pub root_label: String,
}

impl Default for TreeLayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing_scale: 1000.0,
            min_node_spacing: 80.0,
            max_node_spacing: 140.0,
            level_spacing_scale: 1200.0,
            min_level_spacing: 180.0,
            max_level_spacing: 250.0,
            sibling_separation: 1.0,
            subtree_separation: 2.0,
            depth_inset: 100.0,
            orientation: Orientation::Horizontal,
            collapse_depth: 2,
            root_label: "Arbre Généalogique".to_string(),
        }
    }
}

impl TreeLayoutConfig {
    /// Breadth distance between adjacent nodes for a tree of `node_count`.
    pub fn node_spacing(&self, node_count: usize) -> f32 {
        let raw = self.node_spacing_scale / (node_count.max(1) as f32).sqrt();
        raw.clamp(self.min_node_spacing, self.max_node_spacing)
    }

    /// Depth distance between levels for a tree of `height` levels below
    /// the root.
    pub fn level_spacing(&self, height: u32) -> f32 {
        if height == 0 {
            return self.max_level_spacing;
        }
        (self.level_spacing_scale / height as f32).clamp(self.min_level_spacing, self.max_level_spacing)
    }
}

// ============================================================================
// Collapse state
// ============================================================================

/// Set of collapsed tree paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollapseState {
    collapsed: HashSet<String>,
}

impl CollapseState {
    /// Collapse every node with children deeper than `collapse_depth`.
    pub fn initial(forest: &[HierarchyNode], collapse_depth: u32) -> Self {
        let mut collapsed = HashSet::new();
        walk_forest(forest, |path, depth, node| {
            if depth > collapse_depth && !node.children.is_empty() {
                collapsed.insert(path.to_string());
            }
        });
        Self { collapsed }
    }

    pub fn is_collapsed(&self, path: &str) -> bool {
        self.collapsed.contains(path)
    }

    /// Flip a path. Returns true when the path is now collapsed.
    pub fn toggle(&mut self, path: &str) -> bool {
        if self.collapsed.remove(path) {
            false
        } else {
            self.collapsed.insert(path.to_string());
            true
        }
    }

    pub fn len(&self) -> usize {
        self.collapsed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collapsed.is_empty()
    }
}

/// Visit every forest node with its path and depth (roots at depth 1).
fn walk_forest<'a>(forest: &'a [HierarchyNode], mut visit: impl FnMut(&str, u32, &'a HierarchyNode)) {
    let mut stack: Vec<(String, u32, &HierarchyNode)> = forest
        .iter()
        .enumerate()
        .rev()
        .map(|(i, node)| (i.to_string(), 1, node))
        .collect();

    while let Some((path, depth, node)) = stack.pop() {
        visit(&path, depth, node);
        for (i, child) in node.children.iter().enumerate().rev() {
            stack.push((format!("{path}/{i}"), depth + 1, child));
        }
    }
}

/// Resolve a child-index path such as `"0/2/1"` in a forest.
pub fn find_path<'a>(forest: &'a [HierarchyNode], path: &str) -> Option<&'a HierarchyNode> {
    let mut segments = path.split('/').map(|s| s.parse::<usize>().ok());
    let mut node = forest.get(segments.next()??)?;
    for segment in segments {
        node = node.children.get(segment?)?;
    }
    Some(node)
}

// ============================================================================
// Output
// ============================================================================

/// A positioned tree node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedTreeNode {
    /// Child-index path; empty for the super-root.
    pub path: String,
    pub name: String,
    pub genre: Gender,
    /// Super-root is 0, forest roots are 1.
    pub depth: u32,
    pub x: f32,
    pub y: f32,
    /// Children exist but are hidden.
    pub collapsed: bool,
    /// The synthetic super-root.
    pub synthetic: bool,
}

/// Parent → child edge between two entries of [`TreeLayout::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TreeLink {
    pub source: usize,
    pub target: usize,
}

/// Result of the tidy tree layout, nodes in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeLayout {
    pub nodes: Vec<PlacedTreeNode>,
    pub links: Vec<TreeLink>,
    pub node_spacing: f32,
    pub level_spacing: f32,
}

impl TreeLayout {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the node with the given path.
    pub fn position(&self, path: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.path == path && !n.synthetic)
    }
}

// ============================================================================
// Layout engine
// ============================================================================

/// Internal arena node.
#[derive(Debug)]
struct LayoutNode<'a> {
    source: Option<&'a HierarchyNode>,
    path: String,
    depth: u32,
    parent: Option<usize>,
    children: Vec<usize>,
    collapsed: bool,
    /// Breadth offset relative to the parent.
    offset: f32,
}

/// Per-level breadth extent of a subtree, relative to its root.
type Contour = Vec<(f32, f32)>;

/// The tidy tree layout engine.
pub struct TidyTreeLayout {
    config: TreeLayoutConfig,
}

impl TidyTreeLayout {
    /// Create a new tidy tree layout with the given configuration.
    pub fn new(config: TreeLayoutConfig) -> Self {
        Self { config }
    }

    /// Create a tidy tree layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TreeLayoutConfig::default())
    }

    pub fn config(&self) -> &TreeLayoutConfig {
        &self.config
    }

    /// Lay out the visible part of a forest on a `width` x `height` canvas.
    ///
    /// Spacing is derived from the full forest, so collapsing a branch
    /// does not rescale the rest of the tree.
    pub fn compute(
        &self,
        forest: &[HierarchyNode],
        collapse: &CollapseState,
        width: f32,
        height: f32,
    ) -> TreeLayout {
        if forest.is_empty() {
            return TreeLayout::default();
        }

        let mut total = 1;
        let mut tree_height = 0;
        walk_forest(forest, |_, depth, _| {
            total += 1;
            tree_height = tree_height.max(depth);
        });
        let node_spacing = self.config.node_spacing(total);
        let level_spacing = self.config.level_spacing(tree_height);

        let mut arena = Self::build_arena(forest, collapse);
        let breadth = self.place(&mut arena);

        // Breadth centred on the canvas cross axis, shallowest level inset
        let cross_extent = match self.config.orientation {
            Orientation::Horizontal => height,
            Orientation::Vertical => width,
        };
        let min_b = breadth.iter().copied().fold(f32::INFINITY, f32::min);
        let max_b = breadth.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let center = (min_b + max_b) / 2.0 * node_spacing;

        let mut nodes = Vec::with_capacity(arena.len());
        let mut links = Vec::with_capacity(arena.len().saturating_sub(1));
        for (i, node) in arena.iter().enumerate() {
            let b = breadth[i] * node_spacing - center + cross_extent / 2.0;
            let d = node.depth as f32 * level_spacing + self.config.depth_inset;
            let (x, y) = match self.config.orientation {
                Orientation::Horizontal => (d, b),
                Orientation::Vertical => (b, d),
            };

            let (name, genre) = match node.source {
                Some(source) => (source.name.clone(), source.genre),
                None => (self.config.root_label.clone(), Gender::Unknown),
            };
            nodes.push(PlacedTreeNode {
                path: node.path.clone(),
                name,
                genre,
                depth: node.depth,
                x,
                y,
                collapsed: node.collapsed,
                synthetic: node.source.is_none(),
            });
            if let Some(parent) = node.parent {
                links.push(TreeLink {
                    source: parent,
                    target: i,
                });
            }
        }

        TreeLayout {
            nodes,
            links,
            node_spacing,
            level_spacing,
        }
    }

    /// Flatten the visible forest in pre-order under a super-root.
    fn build_arena<'a>(forest: &'a [HierarchyNode], collapse: &CollapseState) -> Vec<LayoutNode<'a>> {
        let mut arena = vec![LayoutNode {
            source: None,
            path: String::new(),
            depth: 0,
            parent: None,
            children: Vec::new(),
            collapsed: false,
            offset: 0.0,
        }];

        let mut stack: Vec<(usize, String, &HierarchyNode)> = forest
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (0, i.to_string(), node))
            .collect();

        while let Some((parent, path, node)) = stack.pop() {
            let index = arena.len();
            let collapsed = !node.children.is_empty() && collapse.is_collapsed(&path);
            if !collapsed {
                for (i, child) in node.children.iter().enumerate().rev() {
                    stack.push((index, format!("{path}/{i}"), child));
                }
            }
            let depth = arena[parent].depth + 1;
            arena[parent].children.push(index);
            arena.push(LayoutNode {
                source: Some(node),
                path,
                depth,
                parent: Some(parent),
                children: Vec::new(),
                collapsed,
                offset: 0.0,
            });
        }

        arena
    }

    /// Contour merge then accumulation. Returns breadth per arena node,
    /// in node-spacing units.
    fn place(&self, arena: &mut [LayoutNode<'_>]) -> Vec<f32> {
        let mut contours: Vec<Contour> = vec![Vec::new(); arena.len()];

        for v in (0..arena.len()).rev() {
            let children = std::mem::take(&mut arena[v].children);
            let mut merged: Contour = vec![(0.0, 0.0)];

            if !children.is_empty() {
                let mut offsets = Vec::with_capacity(children.len());
                // Right contour of everything placed so far, absolute
                let mut placed: Contour = Vec::new();

                for &child in &children {
                    let contour = std::mem::take(&mut contours[child]);
                    let shift = if placed.is_empty() {
                        0.0
                    } else {
                        placed
                            .iter()
                            .zip(contour.iter())
                            .enumerate()
                            .map(|(level, (&(_, right), &(left, _)))| {
                                let separation = if level == 0 {
                                    self.config.sibling_separation
                                } else {
                                    self.config.subtree_separation
                                };
                                right + separation - left
                            })
                            .fold(f32::NEG_INFINITY, f32::max)
                    };

                    for (level, &(left, right)) in contour.iter().enumerate() {
                        let (left, right) = (left + shift, right + shift);
                        match placed.get_mut(level) {
                            Some(extent) => {
                                extent.0 = extent.0.min(left);
                                extent.1 = extent.1.max(right);
                            }
                            None => placed.push((left, right)),
                        }
                    }
                    offsets.push(shift);
                }

                let first = offsets[0];
                let last = offsets[offsets.len() - 1];
                let mid = (first + last) / 2.0;
                for (&child, &offset) in children.iter().zip(offsets.iter()) {
                    arena[child].offset = offset - mid;
                }
                merged.extend(placed.into_iter().map(|(l, r)| (l - mid, r - mid)));
            }

            contours[v] = merged;
            arena[v].children = children;
        }

        let mut breadth = vec![0.0f32; arena.len()];
        for v in 1..arena.len() {
            if let Some(parent) = arena[v].parent {
                breadth[v] = breadth[parent] + arena[v].offset;
            }
        }
        breadth
    }
}

/// Lay out a forest with default configuration and initial collapse.
pub fn layout_hierarchy_tree(forest: &[HierarchyNode], width: f32, height: f32) -> TreeLayout {
    let layout = TidyTreeLayout::with_defaults();
    let collapse = CollapseState::initial(forest, layout.config().collapse_depth);
    layout.compute(forest, &collapse, width, height)
}

//! Piecewise-linear `y = f(x)` evaluator used for every score curve.
//!
//! Nodes are kept in non-decreasing `x` order.  Inputs left of the first
//! node or right of the last clamp to that node's `y`.  Two nodes sharing an
//! `x` form a step; the later node wins at and after the step.
//!
//! JSON shape (the authoring format):
//!
//! ```json
//! { "nodes": [ { "x": 0.0, "y": 0.0 }, { "x": 10.0, "y": 1.0 } ] }
//! ```

use crate::{CoreError, CoreResult};

/// One `(x, y)` sample.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphNode {
    pub x: f32,
    pub y: f32,
}

/// Piecewise-linear curve.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph2d {
    #[cfg_attr(feature = "serde", serde(default))]
    nodes: Vec<GraphNode>,
}

impl Graph2d {
    /// Build from `(x, y)` pairs.  Fails if the `x` values decrease.
    pub fn new(points: &[(f32, f32)]) -> CoreResult<Self> {
        let graph = Graph2d {
            nodes: points.iter().map(|&(x, y)| GraphNode { x, y }).collect(),
        };
        graph.validate()?;
        Ok(graph)
    }

    /// A graph that evaluates to `1.0` everywhere: the "no penalty" curve.
    pub fn identity() -> Self {
        Graph2d { nodes: vec![GraphNode { x: 0.0, y: 1.0 }] }
    }

    /// Replace an empty graph with [`Graph2d::identity`].
    pub fn or_identity(self) -> Self {
        if self.nodes.is_empty() { Self::identity() } else { self }
    }

    /// Check node ordering and finiteness.  Deserialized graphs skip the
    /// constructor, so config loaders call this explicitly.
    pub fn validate(&self) -> CoreResult<()> {
        for node in &self.nodes {
            if !node.x.is_finite() || !node.y.is_finite() {
                return Err(CoreError::Graph(format!("non-finite node ({}, {})", node.x, node.y)));
            }
        }
        for pair in self.nodes.windows(2) {
            if pair[1].x < pair[0].x {
                return Err(CoreError::Graph(format!(
                    "x must be non-decreasing: {} follows {}",
                    pair[1].x, pair[0].x
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn node(&self, index: usize) -> Option<GraphNode> {
        self.nodes.get(index).copied()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Evaluate the curve at `x`.  An empty graph evaluates to `0.0`.
    pub fn evaluate(&self, x: f32) -> f32 {
        let (first, last) = match (self.nodes.first(), self.nodes.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };
        if x < first.x {
            return first.y;
        }
        for pair in self.nodes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x < b.x {
                let t = (x - a.x) / (b.x - a.x);
                return a.y + t * (b.y - a.y);
            }
        }
        last.y
    }
}

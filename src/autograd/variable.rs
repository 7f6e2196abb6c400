//! Variable type carrying either a gradient or a graph node

use super::context::LeafLayout;
use super::node::NodeRef;
use crate::config::Mode;
use ndarray::{Array1, Array2};

#[derive(Clone)]
enum Trace {
    Forward {
        gradient: Array2<f64>,
        layout: LeafLayout,
    },
    Reverse {
        node: NodeRef,
    },
}

/// Value produced by a block application
///
/// A forward-mode variable holds the Jacobian of its data w.r.t. all leaves
/// (rows = data elements, columns = leaf elements). A reverse-mode variable
/// holds a node recording how it was computed. Never both.
#[derive(Clone)]
pub struct Variable {
    data: Array1<f64>,
    trace: Trace,
}

impl Variable {
    pub(crate) fn forward(data: Array1<f64>, gradient: Array2<f64>, layout: LeafLayout) -> Self {
        Self {
            data,
            trace: Trace::Forward { gradient, layout },
        }
    }

    pub(crate) fn reverse(data: Array1<f64>, node: NodeRef) -> Self {
        Self {
            data,
            trace: Trace::Reverse { node },
        }
    }

    /// Get reference to data
    pub fn data(&self) -> &Array1<f64> {
        &self.data
    }

    /// Mode this variable was produced under
    pub fn mode(&self) -> Mode {
        match self.trace {
            Trace::Forward { .. } => Mode::Forward,
            Trace::Reverse { .. } => Mode::Reverse,
        }
    }

    /// Accumulated Jacobian (forward mode only)
    pub fn gradient(&self) -> Option<&Array2<f64>> {
        match &self.trace {
            Trace::Forward { gradient, .. } => Some(gradient),
            Trace::Reverse { .. } => None,
        }
    }

    /// Leaf layout the gradient columns refer to (forward mode only)
    pub fn layout(&self) -> Option<LeafLayout> {
        match &self.trace {
            Trace::Forward { layout, .. } => Some(*layout),
            Trace::Reverse { .. } => None,
        }
    }

    /// Graph node (reverse mode only)
    pub fn node(&self) -> Option<&NodeRef> {
        match &self.trace {
            Trace::Forward { .. } => None,
            Trace::Reverse { node } => Some(node),
        }
    }

    /// Get size
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl std::fmt::Debug for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Variable");
        s.field("data", &self.data);
        match &self.trace {
            Trace::Forward { gradient, layout } => {
                s.field("gradient", gradient).field("layout", &layout.id())
            }
            Trace::Reverse { node } => s.field("node", &node.id()),
        };
        s.finish()
    }
}

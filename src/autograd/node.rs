//! Reverse-mode graph records

use ndarray::Array2;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Shared handle to a graph node
pub type NodeRef = Rc<Node>;

/// Process-unique node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

impl NodeId {
    fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Dependency edge from a node to one of its inputs
pub struct Edge {
    child: NodeRef,
    jacobian: Array2<f64>,
}

impl Edge {
    pub(crate) fn new(child: NodeRef, jacobian: Array2<f64>) -> Self {
        Self { child, jacobian }
    }

    /// Node of the input this edge differentiates through
    pub fn child(&self) -> &NodeRef {
        &self.child
    }

    /// Local Jacobian of the owning node's value w.r.t. the child's value
    pub fn jacobian(&self) -> &Array2<f64> {
        &self.jacobian
    }
}

impl fmt::Debug for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("child", &self.child.id)
            .field("jacobian_shape", &self.jacobian.shape())
            .finish()
    }
}

/// Graph record of one reverse-mode variable
///
/// Edges are fixed at creation. Only the use-counter changes afterwards,
/// once per downstream edge that targets this node.
pub struct Node {
    id: NodeId,
    children: Vec<Edge>,
    times_used: Cell<usize>,
}

impl Node {
    /// Node without dependencies
    pub(crate) fn leaf() -> NodeRef {
        Self::with_children(Vec::new())
    }

    /// Node depending on `children`; marks every child as used once more
    pub(crate) fn with_children(children: Vec<Edge>) -> NodeRef {
        for edge in &children {
            edge.child.times_used.set(edge.child.times_used.get() + 1);
        }
        Rc::new(Self {
            id: NodeId::fresh(),
            children,
            times_used: Cell::new(0),
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Edges in the order the inputs were passed to the block
    pub fn children(&self) -> &[Edge] {
        &self.children
    }

    /// Number of downstream edges pointing at this node
    pub fn times_used(&self) -> usize {
        self.times_used.get()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("children", &self.children)
            .field("times_used", &self.times_used.get())
            .finish()
    }
}

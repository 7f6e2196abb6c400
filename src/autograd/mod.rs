//! Block-based automatic differentiation
//!
//! Every elementary operation is a [`Block`] that knows its value and its
//! local Jacobians. Applying a block under a [`Context`] either carries the
//! accumulated Jacobian forward with the value, or records a graph [`Node`]
//! for a later [`backward`] pass.

mod backward;
mod block;
mod context;
mod double;
mod node;
mod ops;
mod simple;
mod variable;


pub use backward::{backward, Gradients};
pub use block::{Block, Input};
pub use context::{Context, LeafLayout};
pub use double::{Double, DoubleBlock};
pub use node::{Edge, Node, NodeId, NodeRef};
pub use ops::*;
pub use simple::{Simple, SimpleBlock};
pub use variable::Variable;

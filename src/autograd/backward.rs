//! Backward pass over recorded node edges

use super::node::{NodeId, NodeRef};
use super::Variable;
use crate::config::Mode;
use crate::error::{Error, Result};
use ndarray::Array2;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::rc::Rc;

/// Jacobians of one output w.r.t. every node reachable from it
#[derive(Debug, Default)]
pub struct Gradients {
    by_node: HashMap<NodeId, Array2<f64>>,
}

impl Gradients {
    /// Jacobian of the output w.r.t. `var`
    ///
    /// Rows follow the seed, columns the elements of `var`. `None` for
    /// forward-mode variables and for variables the output does not depend on.
    pub fn wrt(&self, var: &Variable) -> Option<&Array2<f64>> {
        var.node().and_then(|node| self.by_node.get(&node.id()))
    }

    pub fn wrt_node(&self, id: NodeId) -> Option<&Array2<f64>> {
        self.by_node.get(&id)
    }

    /// Number of nodes that received a gradient
    pub fn len(&self) -> usize {
        self.by_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_node.is_empty()
    }
}

/// Perform backward pass from a reverse-mode variable
///
/// Without a seed, the identity of the output dimension is used and every
/// result is a full Jacobian. A seed `S` of shape `k x len(output)` yields
/// `S · J` instead.
///
/// A node is expanded only once all edges reaching it from the output have
/// contributed to its accumulated gradient.
pub fn backward(output: &Variable, seed: Option<Array2<f64>>) -> Result<Gradients> {
    let root = output.node().ok_or(Error::ModeMismatch {
        expected: Mode::Reverse,
        got: output.mode(),
    })?;

    let seed = match seed {
        Some(seed) if seed.ncols() != output.len() => {
            return Err(Error::ShapeMismatch {
                context: "backward seed columns".to_string(),
                expected: vec![output.len()],
                got: vec![seed.ncols()],
            });
        }
        Some(seed) => seed,
        None => Array2::eye(output.len()),
    };

    let pending = count_consumers(root);

    let mut remaining = pending.clone();
    let mut adjoints: HashMap<NodeId, Array2<f64>> = HashMap::new();
    adjoints.insert(root.id(), seed);

    let mut ready: Vec<NodeRef> = vec![Rc::clone(root)];
    while let Some(node) = ready.pop() {
        let Some(adjoint) = adjoints.remove(&node.id()) else {
            continue;
        };

        for edge in node.children() {
            let child = edge.child();
            let contribution = adjoint.dot(edge.jacobian());
            match adjoints.entry(child.id()) {
                Entry::Occupied(mut entry) => *entry.get_mut() += &contribution,
                Entry::Vacant(entry) => {
                    entry.insert(contribution);
                }
            }

            if let Some(count) = remaining.get_mut(&child.id()) {
                *count -= 1;
                if *count == 0 {
                    ready.push(Rc::clone(child));
                }
            }
        }

        adjoints.insert(node.id(), adjoint);
    }

    log::debug!(
        "backward from node {:?}: {} nodes, {} edges",
        root.id(),
        adjoints.len(),
        pending.values().sum::<usize>()
    );

    Ok(Gradients { by_node: adjoints })
}

/// In-degree of every node inside the subgraph reachable from `root`
///
/// Counts never exceed `times_used`; the difference is consumers outside
/// this subgraph, which contribute nothing here.
fn count_consumers(root: &NodeRef) -> HashMap<NodeId, usize> {
    let mut counts: HashMap<NodeId, usize> = HashMap::new();
    let mut visited: HashMap<NodeId, NodeRef> = HashMap::new();
    visited.insert(root.id(), Rc::clone(root));

    let mut stack = vec![Rc::clone(root)];
    while let Some(node) = stack.pop() {
        for edge in node.children() {
            let child = edge.child();
            *counts.entry(child.id()).or_insert(0) += 1;
            if let Entry::Vacant(entry) = visited.entry(child.id()) {
                entry.insert(Rc::clone(child));
                stack.push(Rc::clone(child));
            }
        }
    }

    for (id, node) in &visited {
        let reached = counts.get(id).copied().unwrap_or(0);
        debug_assert!(reached <= node.times_used());
        if *id != root.id() && reached < node.times_used() {
            log::trace!(
                "node {:?} used {} times, {} inside this backward pass",
                id,
                node.times_used(),
                reached
            );
        }
    }

    counts
}

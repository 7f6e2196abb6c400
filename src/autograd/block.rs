//! Block trait: the unit of differentiable computation

use super::context::{Context, LeafLayout};
use super::node::{Edge, Node};
use super::Variable;
use crate::config::Mode;
use crate::error::{Error, Result};
use ndarray::{concatenate, Array1, Array2, ArrayView2, Axis};

/// Argument of a block application
///
/// Only variables take part in differentiation. Constants are used for the
/// value and their Jacobian columns are dropped.
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    Variable(&'a Variable),
    Constant(&'a Array1<f64>),
}

impl<'a> Input<'a> {
    pub fn data(&self) -> &'a Array1<f64> {
        match *self {
            Input::Variable(var) => var.data(),
            Input::Constant(data) => data,
        }
    }

    pub fn as_variable(&self) -> Option<&'a Variable> {
        match *self {
            Input::Variable(var) => Some(var),
            Input::Constant(_) => None,
        }
    }
}

impl<'a> From<&'a Variable> for Input<'a> {
    fn from(var: &'a Variable) -> Self {
        Input::Variable(var)
    }
}

impl<'a> From<&'a Array1<f64>> for Input<'a> {
    fn from(data: &'a Array1<f64>) -> Self {
        Input::Constant(data)
    }
}

/// Elementary operation with a known value and Jacobian
///
/// Implementors supply [`Block::compute_value`] and
/// [`Block::compute_local_jacobians`]; the defaults report
/// [`Error::NotImplemented`]. Blocks must be pure: the same inputs always
/// give the same value and Jacobians.
pub trait Block {
    /// Name used in errors and logs
    fn name(&self) -> &'static str;

    /// Value of the operation at `inputs`
    fn compute_value(&self, _inputs: &[&Array1<f64>]) -> Result<Array1<f64>> {
        Err(Error::NotImplemented {
            block: self.name(),
            operation: "compute_value",
        })
    }

    /// One Jacobian per input, in input order, each `output_dim x input_dim`
    fn compute_local_jacobians(&self, _inputs: &[&Array1<f64>]) -> Result<Vec<Array2<f64>>> {
        Err(Error::NotImplemented {
            block: self.name(),
            operation: "compute_local_jacobians",
        })
    }

    /// Chain rule applied once: `[J_1 .. J_k] · [G_1; ..; G_k]`
    ///
    /// `J_i` is the local Jacobian and `G_i` the accumulated gradient of the
    /// i-th variable input. Constant inputs take no part.
    fn propagate_forward(&self, ctx: &Context, inputs: &[Input<'_>]) -> Result<Array2<f64>> {
        forward_layout(self.name(), ctx, inputs)?;

        let data = input_data(inputs);
        let jacobians = checked_jacobians(self, &data, None)?;

        let mut gradients: Vec<ArrayView2<'_, f64>> = Vec::new();
        let mut selected: Vec<ArrayView2<'_, f64>> = Vec::new();
        for (input, jacobian) in inputs.iter().zip(jacobians.iter()) {
            if let Some(gradient) = input.as_variable().and_then(Variable::gradient) {
                gradients.push(gradient.view());
                selected.push(jacobian.view());
            }
        }

        let stacked = concatenate(Axis(0), &gradients).map_err(|e| Error::ShapeMismatch {
            context: format!("`{}` gradient stacking ({})", self.name(), e),
            expected: vec![gradients[0].ncols()],
            got: gradients.iter().map(|g| g.ncols()).collect(),
        })?;
        let combined = concatenate(Axis(1), &selected).map_err(|e| Error::ShapeMismatch {
            context: format!("`{}` jacobian concatenation ({})", self.name(), e),
            expected: vec![selected[0].nrows()],
            got: selected.iter().map(|j| j.nrows()).collect(),
        })?;

        Ok(combined.dot(&stacked))
    }

    /// Compute the value and, depending on the context mode, either the
    /// accumulated gradient (forward) or a graph node (reverse)
    fn apply(&self, ctx: &Context, inputs: &[Input<'_>]) -> Result<Variable> {
        let data = input_data(inputs);
        let value = self.compute_value(&data)?;

        match ctx.mode() {
            Mode::Forward => {
                let layout = forward_layout(self.name(), ctx, inputs)?;
                let gradient = self.propagate_forward(ctx, inputs)?;
                if gradient.nrows() != value.len() {
                    return Err(Error::ShapeMismatch {
                        context: format!("`{}` jacobian rows", self.name()),
                        expected: vec![value.len()],
                        got: vec![gradient.nrows()],
                    });
                }

                log::trace!(
                    "forward {}: {} inputs -> gradient {:?}",
                    self.name(),
                    inputs.len(),
                    gradient.shape()
                );
                Ok(Variable::forward(value, gradient, layout))
            }
            Mode::Reverse => {
                let jacobians = checked_jacobians(self, &data, Some(value.len()))?;

                let mut children = Vec::with_capacity(inputs.len());
                for (input, jacobian) in inputs.iter().zip(jacobians) {
                    if let Input::Variable(var) = input {
                        let node = var.node().ok_or(Error::ModeMismatch {
                            expected: Mode::Reverse,
                            got: var.mode(),
                        })?;
                        children.push(Edge::new(node.clone(), jacobian));
                    }
                }

                let node = Node::with_children(children);
                log::trace!(
                    "reverse {}: node {:?} with {} of {} inputs recorded",
                    self.name(),
                    node.id(),
                    node.children().len(),
                    inputs.len()
                );
                Ok(Variable::reverse(value, node))
            }
        }
    }
}

fn input_data<'a>(inputs: &[Input<'a>]) -> Vec<&'a Array1<f64>> {
    inputs.iter().map(Input::data).collect()
}

/// Layout shared by the variable inputs of a forward application
fn forward_layout(block: &'static str, ctx: &Context, inputs: &[Input<'_>]) -> Result<LeafLayout> {
    let mut first: Option<(LeafLayout, usize)> = None;

    for var in inputs.iter().filter_map(Input::as_variable) {
        let (layout, gradient) = match (var.layout(), var.gradient()) {
            (Some(layout), Some(gradient)) => (layout, gradient),
            _ => {
                return Err(Error::ModeMismatch {
                    expected: Mode::Forward,
                    got: var.mode(),
                })
            }
        };

        match first {
            None => first = Some((layout, gradient.ncols())),
            Some((expected, _)) if ctx.check_leaf_layout() && expected != layout => {
                return Err(Error::LeafLayoutMismatch {
                    first: expected.id(),
                    second: layout.id(),
                });
            }
            Some((_, columns)) if columns != gradient.ncols() => {
                return Err(Error::ShapeMismatch {
                    context: format!("`{}` leaf columns", block),
                    expected: vec![columns],
                    got: vec![gradient.ncols()],
                });
            }
            Some(_) => {}
        }
    }

    first
        .map(|(layout, _)| layout)
        .ok_or(Error::NoDifferentiableInput { block })
}

/// Local Jacobians with their count and shapes verified
///
/// With `output_dim` unset, the row count of the first Jacobian is taken as
/// the output dimension.
fn checked_jacobians<B: Block + ?Sized>(
    block: &B,
    data: &[&Array1<f64>],
    output_dim: Option<usize>,
) -> Result<Vec<Array2<f64>>> {
    let jacobians = block.compute_local_jacobians(data)?;
    if jacobians.len() != data.len() {
        return Err(Error::ShapeMismatch {
            context: format!("`{}` jacobian count", block.name()),
            expected: vec![data.len()],
            got: vec![jacobians.len()],
        });
    }

    let rows = output_dim.or_else(|| jacobians.first().map(|j| j.nrows()));
    for (jacobian, input) in jacobians.iter().zip(data) {
        let expected = [rows.unwrap_or(0), input.len()];
        if jacobian.shape() != expected {
            return Err(Error::ShapeMismatch {
                context: format!("`{}` local jacobian", block.name()),
                expected: expected.to_vec(),
                got: jacobian.shape().to_vec(),
            });
        }
    }

    Ok(jacobians)
}

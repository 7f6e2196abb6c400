//! Two-input blocks

use super::Block;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2};

/// Operation of two inputs supplying one Jacobian per input
///
/// Wrap an implementor in [`Double`] to obtain a [`Block`].
pub trait DoubleBlock {
    fn name(&self) -> &'static str;

    /// Value of the operation at `(a, b)`
    fn compute_value(&self, _a: &Array1<f64>, _b: &Array1<f64>) -> Result<Array1<f64>> {
        Err(Error::NotImplemented {
            block: self.name(),
            operation: "compute_value",
        })
    }

    /// Jacobians w.r.t. `a` and `b`, each `output_dim x input_dim`
    fn compute_local_jacobians(
        &self,
        _a: &Array1<f64>,
        _b: &Array1<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        Err(Error::NotImplemented {
            block: self.name(),
            operation: "compute_local_jacobians",
        })
    }
}

/// [`Block`] adapter for a [`DoubleBlock`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Double<D>(pub D);

impl<D: DoubleBlock> Block for Double<D> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn compute_value(&self, inputs: &[&Array1<f64>]) -> Result<Array1<f64>> {
        let (a, b) = pair(self.name(), inputs)?;
        self.0.compute_value(a, b)
    }

    fn compute_local_jacobians(&self, inputs: &[&Array1<f64>]) -> Result<Vec<Array2<f64>>> {
        let (a, b) = pair(self.name(), inputs)?;
        let (jacobian_a, jacobian_b) = self.0.compute_local_jacobians(a, b)?;
        Ok(vec![jacobian_a, jacobian_b])
    }
}

fn pair<'a>(
    block: &'static str,
    inputs: &[&'a Array1<f64>],
) -> Result<(&'a Array1<f64>, &'a Array1<f64>)> {
    match inputs {
        [a, b] => Ok((*a, *b)),
        _ => Err(Error::Arity {
            block,
            expected: 2,
            got: inputs.len(),
        }),
    }
}

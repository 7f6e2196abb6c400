//! Single-input elementwise blocks

use super::Block;
use crate::error::{Error, Result};
use ndarray::{Array1, Array2};

/// Elementwise map R^n -> R^n described by its scalar derivative
///
/// Wrap an implementor in [`Simple`] to obtain a [`Block`]; its Jacobian is
/// the dense diagonal matrix of [`SimpleBlock::compute_gradient_fn`].
pub trait SimpleBlock {
    fn name(&self) -> &'static str;

    /// Value of the operation at `input`
    fn compute_value(&self, _input: &Array1<f64>) -> Result<Array1<f64>> {
        Err(Error::NotImplemented {
            block: self.name(),
            operation: "compute_value",
        })
    }

    /// Elementwise derivative at `input`, same shape as `input`
    fn compute_gradient_fn(&self, _input: &Array1<f64>) -> Result<Array1<f64>> {
        Err(Error::NotImplemented {
            block: self.name(),
            operation: "compute_gradient_fn",
        })
    }
}

/// [`Block`] adapter for a [`SimpleBlock`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Simple<S>(pub S);

impl<S: SimpleBlock> Block for Simple<S> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn compute_value(&self, inputs: &[&Array1<f64>]) -> Result<Array1<f64>> {
        let input = single(self.name(), inputs)?;
        self.0.compute_value(input)
    }

    fn compute_local_jacobians(&self, inputs: &[&Array1<f64>]) -> Result<Vec<Array2<f64>>> {
        let input = single(self.name(), inputs)?;
        let diagonal = self.0.compute_gradient_fn(input)?;
        if diagonal.len() != input.len() {
            return Err(Error::ShapeMismatch {
                context: format!("`{}` elementwise derivative", self.name()),
                expected: vec![input.len()],
                got: vec![diagonal.len()],
            });
        }
        Ok(vec![Array2::from_diag(&diagonal)])
    }
}

fn single<'a>(block: &'static str, inputs: &[&'a Array1<f64>]) -> Result<&'a Array1<f64>> {
    match inputs {
        [input] => Ok(*input),
        _ => Err(Error::Arity {
            block,
            expected: 1,
            got: inputs.len(),
        }),
    }
}

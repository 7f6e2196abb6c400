//! Concrete blocks and convenience functions

use super::{Block, Context, Double, DoubleBlock, Input, Simple, SimpleBlock, Variable};
use crate::error::{Error, Result};
use ndarray::{arr1, Array1, Array2, Axis};

/// Sine, derivative cosine
#[derive(Debug, Clone, Copy, Default)]
pub struct Sin;

impl SimpleBlock for Sin {
    fn name(&self) -> &'static str {
        "sin"
    }

    fn compute_value(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(f64::sin))
    }

    fn compute_gradient_fn(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(f64::cos))
    }
}

/// Cosine, derivative -sine
#[derive(Debug, Clone, Copy, Default)]
pub struct Cos;

impl SimpleBlock for Cos {
    fn name(&self) -> &'static str {
        "cos"
    }

    fn compute_value(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(f64::cos))
    }

    fn compute_gradient_fn(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(|x| -x.sin()))
    }
}

/// Natural exponential
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl SimpleBlock for Exp {
    fn name(&self) -> &'static str {
        "exp"
    }

    fn compute_value(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(f64::exp))
    }

    fn compute_gradient_fn(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(f64::exp))
    }
}

/// Natural logarithm; NaN outside the positive reals
#[derive(Debug, Clone, Copy, Default)]
pub struct Ln;

impl SimpleBlock for Ln {
    fn name(&self) -> &'static str {
        "ln"
    }

    fn compute_value(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(f64::ln))
    }

    fn compute_gradient_fn(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(f64::recip))
    }
}

/// Hyperbolic tangent
///
/// tanh'(x) = 1 - tanh²(x)
#[derive(Debug, Clone, Copy, Default)]
pub struct Tanh;

impl SimpleBlock for Tanh {
    fn name(&self) -> &'static str {
        "tanh"
    }

    fn compute_value(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(f64::tanh))
    }

    fn compute_gradient_fn(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(|x| {
            let t = x.tanh();
            1.0 - t * t
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Square;

impl SimpleBlock for Square {
    fn name(&self) -> &'static str {
        "square"
    }

    fn compute_value(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(|x| x * x))
    }

    fn compute_gradient_fn(&self, input: &Array1<f64>) -> Result<Array1<f64>> {
        Ok(input.mapv(|x| 2.0 * x))
    }
}

fn same_len(block: &'static str, a: &Array1<f64>, b: &Array1<f64>) -> Result<()> {
    if a.len() != b.len() {
        return Err(Error::ShapeMismatch {
            context: format!("`{}` operands", block),
            expected: vec![a.len()],
            got: vec![b.len()],
        });
    }
    Ok(())
}

/// Elementwise sum
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl DoubleBlock for Add {
    fn name(&self) -> &'static str {
        "add"
    }

    fn compute_value(&self, a: &Array1<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
        same_len(self.name(), a, b)?;
        Ok(a + b)
    }

    fn compute_local_jacobians(
        &self,
        a: &Array1<f64>,
        b: &Array1<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        same_len(self.name(), a, b)?;
        Ok((Array2::eye(a.len()), Array2::eye(b.len())))
    }
}

/// Elementwise difference `a - b`
#[derive(Debug, Clone, Copy, Default)]
pub struct Subtract;

impl DoubleBlock for Subtract {
    fn name(&self) -> &'static str {
        "subtract"
    }

    fn compute_value(&self, a: &Array1<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
        same_len(self.name(), a, b)?;
        Ok(a - b)
    }

    fn compute_local_jacobians(
        &self,
        a: &Array1<f64>,
        b: &Array1<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        same_len(self.name(), a, b)?;
        Ok((Array2::eye(a.len()), -Array2::<f64>::eye(b.len())))
    }
}

/// Elementwise product
///
/// ∂(a*b)/∂a = diag(b), ∂(a*b)/∂b = diag(a)
#[derive(Debug, Clone, Copy, Default)]
pub struct Multiply;

impl DoubleBlock for Multiply {
    fn name(&self) -> &'static str {
        "multiply"
    }

    fn compute_value(&self, a: &Array1<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
        same_len(self.name(), a, b)?;
        Ok(a * b)
    }

    fn compute_local_jacobians(
        &self,
        a: &Array1<f64>,
        b: &Array1<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        same_len(self.name(), a, b)?;
        Ok((Array2::from_diag(b), Array2::from_diag(a)))
    }
}

/// Inner product, a one-element output
///
/// ∂(a·b)/∂a = bᵀ, ∂(a·b)/∂b = aᵀ
#[derive(Debug, Clone, Copy, Default)]
pub struct Dot;

impl DoubleBlock for Dot {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn compute_value(&self, a: &Array1<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
        same_len(self.name(), a, b)?;
        Ok(arr1(&[a.dot(b)]))
    }

    fn compute_local_jacobians(
        &self,
        a: &Array1<f64>,
        b: &Array1<f64>,
    ) -> Result<(Array2<f64>, Array2<f64>)> {
        same_len(self.name(), a, b)?;
        Ok((
            b.clone().insert_axis(Axis(0)),
            a.clone().insert_axis(Axis(0)),
        ))
    }
}

/// Sine of a variable
pub fn sin(ctx: &Context, x: &Variable) -> Result<Variable> {
    Simple(Sin).apply(ctx, &[x.into()])
}

/// Cosine of a variable
pub fn cos(ctx: &Context, x: &Variable) -> Result<Variable> {
    Simple(Cos).apply(ctx, &[x.into()])
}

/// Exponential of a variable
pub fn exp(ctx: &Context, x: &Variable) -> Result<Variable> {
    Simple(Exp).apply(ctx, &[x.into()])
}

/// Natural logarithm of a variable
pub fn ln(ctx: &Context, x: &Variable) -> Result<Variable> {
    Simple(Ln).apply(ctx, &[x.into()])
}

/// Hyperbolic tangent of a variable
pub fn tanh(ctx: &Context, x: &Variable) -> Result<Variable> {
    Simple(Tanh).apply(ctx, &[x.into()])
}

/// Elementwise square of a variable
pub fn square(ctx: &Context, x: &Variable) -> Result<Variable> {
    Simple(Square).apply(ctx, &[x.into()])
}

/// Elementwise sum; either operand may be a constant
pub fn add<'a>(ctx: &Context, a: impl Into<Input<'a>>, b: impl Into<Input<'a>>) -> Result<Variable> {
    Double(Add).apply(ctx, &[a.into(), b.into()])
}

/// Elementwise difference; either operand may be a constant
pub fn subtract<'a>(
    ctx: &Context,
    a: impl Into<Input<'a>>,
    b: impl Into<Input<'a>>,
) -> Result<Variable> {
    Double(Subtract).apply(ctx, &[a.into(), b.into()])
}

/// Elementwise product; either operand may be a constant
pub fn multiply<'a>(
    ctx: &Context,
    a: impl Into<Input<'a>>,
    b: impl Into<Input<'a>>,
) -> Result<Variable> {
    Double(Multiply).apply(ctx, &[a.into(), b.into()])
}

/// Inner product; either operand may be a constant
pub fn dot<'a>(ctx: &Context, a: impl Into<Input<'a>>, b: impl Into<Input<'a>>) -> Result<Variable> {
    Double(Dot).apply(ctx, &[a.into(), b.into()])
}

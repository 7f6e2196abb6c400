//! Integration tests for the differentiation engine.
//!
//! Builds small compositions through the public API in both accumulation
//! modes and checks values, Jacobians and graph bookkeeping.

use blockgrad::autograd::{Edge, Node};
use blockgrad::config::load_config;
use blockgrad::{
    add, backward, dot, exp, multiply, sin, square, tanh, Block, Context, Error, Input, Mode,
    Variable,
};
use ndarray::{arr1, arr2, Array1, Array2};
use std::io::Write;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Affine map `W x + b` with a fixed matrix, a block of general shape
struct Affine {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl Block for Affine {
    fn name(&self) -> &'static str {
        "affine"
    }

    fn compute_value(&self, inputs: &[&Array1<f64>]) -> blockgrad::Result<Array1<f64>> {
        Ok(self.weights.dot(inputs[0]) + &self.bias)
    }

    fn compute_local_jacobians(&self, _inputs: &[&Array1<f64>]) -> blockgrad::Result<Vec<Array2<f64>>> {
        Ok(vec![self.weights.clone()])
    }
}

/// f(x, w) = tanh(Affine(x) * w) · (x + w), built under `ctx`
fn model(ctx: &Context, x: &Variable, w: &Variable) -> blockgrad::Result<Variable> {
    let affine = Affine {
        weights: arr2(&[[1.0, -0.5, 0.0], [0.25, 2.0, -1.0], [0.0, 0.5, 1.5]]),
        bias: arr1(&[0.1, -0.2, 0.3]),
    };
    let hidden = affine.apply(ctx, &[Input::from(x)])?;
    let gated = tanh(ctx, &multiply(ctx, &hidden, w)?)?;
    let sum = add(ctx, x, w)?;
    dot(ctx, &gated, &sum)
}

#[test]
fn test_forward_and_reverse_agree_on_model() {
    init_logging();
    let x = arr1(&[0.3, -1.1, 0.8]);
    let w = arr1(&[1.5, 0.2, -0.7]);

    let fwd = Context::forward();
    let leaves = fwd.leaves(vec![x.clone(), w.clone()]);
    let forward_out = model(&fwd, &leaves[0], &leaves[1]).unwrap();
    let forward_grad = forward_out.gradient().unwrap();
    assert_eq!(forward_grad.shape(), &[1, 6]);

    let rev = Context::reverse();
    let leaves = rev.leaves(vec![x, w]);
    let reverse_out = model(&rev, &leaves[0], &leaves[1]).unwrap();
    let grads = backward(&reverse_out, None).unwrap();
    let gx = grads.wrt(&leaves[0]).unwrap();
    let gw = grads.wrt(&leaves[1]).unwrap();

    assert!((forward_out.data()[0] - reverse_out.data()[0]).abs() < 1e-12);
    for j in 0..3 {
        assert!((forward_grad[[0, j]] - gx[[0, j]]).abs() < 1e-10);
        assert!((forward_grad[[0, 3 + j]] - gw[[0, j]]).abs() < 1e-10);
    }
}

#[test]
fn test_reverse_graph_structure() {
    init_logging();
    let ctx = Context::reverse();
    let x = ctx.leaf(arr1(&[1.0, 2.0]));
    let c = arr1(&[0.5, 0.5]);

    let a = multiply(&ctx, &x, &c).unwrap();
    let b = sin(&ctx, &x).unwrap();
    let y = add(&ctx, &a, &b).unwrap();

    let x_node = x.node().unwrap();
    assert_eq!(x_node.times_used(), 2);

    let y_node: &Node = y.node().unwrap();
    let edges: &[Edge] = y_node.children();
    assert_eq!(edges.len(), 2);
    assert_eq!(edges[0].child().id(), a.node().unwrap().id());
    assert_eq!(edges[1].child().id(), b.node().unwrap().id());
    assert_eq!(a.node().unwrap().children().len(), 1);
}

#[test]
fn test_scalar_loss_gradient() {
    init_logging();
    // loss = sum(exp(x)²) via dot with ones; d/dx = 2 exp(2x)
    let ctx = Context::reverse();
    let x = ctx.leaf(arr1(&[0.1, -0.3, 0.5]));
    let ones = Array1::<f64>::ones(3);
    let loss = dot(&ctx, &square(&ctx, &exp(&ctx, &x).unwrap()).unwrap(), &ones).unwrap();

    let grads = backward(&loss, None).unwrap();
    let gx = grads.wrt(&x).unwrap();
    assert_eq!(gx.shape(), &[1, 3]);
    for i in 0..3 {
        let expected = 2.0 * (2.0 * x.data()[i]).exp();
        assert!((gx[[0, i]] - expected).abs() < 1e-12);
    }
}

#[test]
fn test_context_from_yaml_file() {
    init_logging();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"mode: reverse\n").unwrap();

    let config = load_config(file.path()).unwrap();
    let ctx = Context::from_config(&config);
    assert_eq!(ctx.mode(), Mode::Reverse);

    let x = ctx.leaf(arr1(&[1.0]));
    let y = sin(&ctx, &x).unwrap();
    assert!(y.gradient().is_none());
    assert!(y.node().is_some());
}

#[test]
fn test_errors_display() {
    let ctx = Context::forward();
    let x = ctx.leaf(arr1(&[1.0]));
    let y = ctx.leaf(arr1(&[2.0]));
    let err = add(&ctx, &x, &y).unwrap_err();
    assert!(matches!(err, Error::LeafLayoutMismatch { .. }));
    assert!(err.to_string().contains("different leaf layouts"));
}

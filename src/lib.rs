//! # blockgrad: block-based automatic differentiation
//!
//! blockgrad composes elementary operations ("blocks") over `ndarray`
//! vectors and computes both the value and the Jacobian of the composition
//! w.r.t. its leaf inputs, in forward or reverse accumulation.
//!
//! ## Architecture
//!
//! - **autograd**: block contract, variables, graph nodes, backward pass
//! - **config**: declarative YAML engine configuration
//! - **error**: crate error type
//!
//! ## Example
//!
//! ```
//! use blockgrad::{backward, multiply, sin, Context};
//! use ndarray::arr1;
//!
//! let ctx = Context::reverse();
//! let x = ctx.leaf(arr1(&[2.0]));
//! let c = arr1(&[3.0]);
//! let y = multiply(&ctx, &sin(&ctx, &x)?, &c)?;
//!
//! let grads = backward(&y, None)?;
//! let dy_dx = grads.wrt(&x).unwrap();
//! assert!((dy_dx[[0, 0]] - 3.0 * 2.0f64.cos()).abs() < 1e-12);
//! # Ok::<(), blockgrad::Error>(())
//! ```

pub mod autograd;
pub mod config;

pub mod error;

// Re-export commonly used types
pub use autograd::{
    add, backward, cos, dot, exp, ln, multiply, sin, square, subtract, tanh, Block, Context,
    Double, DoubleBlock, Gradients, Input, Simple, SimpleBlock, Variable,
};
pub use config::{EngineConfig, Mode};
pub use error::{Error, Result};

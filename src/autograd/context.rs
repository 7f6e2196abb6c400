//! Execution context for building differentiable computations

use super::node::Node;
use super::Variable;
use crate::config::{EngineConfig, Mode};
use crate::error::{Error, Result};
use ndarray::{s, Array1, Array2};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LAYOUT: AtomicU64 = AtomicU64::new(0);

/// Token naming one ordered set of leaves
///
/// In forward mode the columns of every gradient refer to the dimensions of
/// the leaves declared together by [`Context::leaves`]. Gradients minted by
/// different declarations cannot be combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LeafLayout(u64);

impl LeafLayout {
    fn fresh() -> Self {
        Self(NEXT_LAYOUT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw identifier of the layout
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Context threaded through every block application
///
/// The mode is fixed when the context is created and only read afterwards.
#[derive(Debug, Clone)]
pub struct Context {
    mode: Mode,
    check_leaf_layout: bool,
}

impl Context {
    /// Create a new context for the given mode
    pub fn new(mode: Mode) -> Self {
        Self::from_config(&EngineConfig::with_mode(mode))
    }

    /// Forward-accumulation context
    pub fn forward() -> Self {
        Self::new(Mode::Forward)
    }

    /// Reverse-accumulation context
    pub fn reverse() -> Self {
        Self::new(Mode::Reverse)
    }

    /// Create a context from an engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            mode: config.mode,
            check_leaf_layout: config.check_leaf_layout,
        }
    }

    /// Accumulation mode of this context
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Check if in forward mode
    pub fn is_forward(&self) -> bool {
        self.mode == Mode::Forward
    }

    /// Check if in reverse mode
    pub fn is_reverse(&self) -> bool {
        self.mode == Mode::Reverse
    }

    /// Whether forward propagation rejects mixed leaf layouts
    pub fn check_leaf_layout(&self) -> bool {
        self.check_leaf_layout
    }

    /// Declare a single leaf input
    pub fn leaf(&self, data: Array1<f64>) -> Variable {
        let mut leaves = self.leaves(vec![data]);
        leaves.swap_remove(0)
    }

    /// Declare several leaf inputs at once
    ///
    /// In forward mode leaf `i` receives a gradient of shape
    /// `len(i) x sum(len)` holding an identity block at its own column
    /// offset, so all returned leaves share one layout. In reverse mode each
    /// leaf gets a fresh graph node without children.
    pub fn leaves(&self, data: Vec<Array1<f64>>) -> Vec<Variable> {
        match self.mode {
            Mode::Forward => {
                let layout = LeafLayout::fresh();
                let total: usize = data.iter().map(|d| d.len()).sum();
                let mut offset = 0;

                log::debug!(
                    "Declaring {} forward leaves ({} columns, layout {})",
                    data.len(),
                    total,
                    layout.id()
                );

                data.into_iter()
                    .map(|d| {
                        let n = d.len();
                        let mut gradient = Array2::zeros((n, total));
                        gradient
                            .slice_mut(s![.., offset..offset + n])
                            .assign(&Array2::eye(n));
                        offset += n;
                        Variable::forward(d, gradient, layout)
                    })
                    .collect()
            }
            Mode::Reverse => {
                log::debug!("Declaring {} reverse leaves", data.len());
                data.into_iter()
                    .map(|d| Variable::reverse(d, Node::leaf()))
                    .collect()
            }
        }
    }

    /// Create a forward-mode variable with an explicit initial gradient
    ///
    /// The gradient must have one row per data element. The variable gets a
    /// layout of its own.
    pub fn with_gradient(&self, data: Array1<f64>, gradient: Array2<f64>) -> Result<Variable> {
        if self.mode != Mode::Forward {
            return Err(Error::ModeMismatch {
                expected: Mode::Forward,
                got: self.mode,
            });
        }
        if gradient.nrows() != data.len() {
            return Err(Error::ShapeMismatch {
                context: "initial gradient rows".to_string(),
                expected: vec![data.len()],
                got: vec![gradient.nrows()],
            });
        }
        Ok(Variable::forward(data, gradient, LeafLayout::fresh()))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

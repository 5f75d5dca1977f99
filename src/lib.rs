//! Discrete factor (potential function) algebra for probabilistic graphical models.
//!
//! A `Factor` is a table of non-negative weights over the joint states of a set of discrete
//! variables. Bayesian and Markov network code builds on the operations here: product, division,
//! marginalization, reduction and normalization.

pub mod util;
pub mod variable;
pub mod factor;
pub mod init;

pub use factor::{factor_product, Factor};
pub use init::Initialization;
pub use util::{FactorError, Result};
pub use variable::{Assignment, StateToken};

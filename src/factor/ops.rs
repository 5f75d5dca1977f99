//! Binary combination of `Factor`s: product and division over the union of their scopes.

use super::{CardinalityVector, Factor};
use crate::util::{FactorError, Result};

use itertools::iproduct;
use ndarray::prelude as nd;
use tracing::trace;

use std::ops::{Div, Mul};


/// The cell-wise operation applied by a binary combination
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Operation {
    Product,
    Divide
}

impl Operation {

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operation::Product => lhs * rhs,
            // Koller & Friedman Section 10.3.1: division by a zero cell is defined as 0
            Operation::Divide if rhs == 0. => 0.,
            Operation::Divide => lhs / rhs
        }
    }

}


impl Factor {

    /// Product of this `Factor` and another `Factor`.
    ///
    /// Defined in Koller & Friedman Section 4.2.1
    ///
    /// # Returns
    /// A new `Factor` whose scope is the scope of `self` followed by the variables of `other`
    /// that `self` does not have, in `other`'s order.
    ///
    /// # Errors
    /// * `FactorError::CardinalityMismatch`, if a shared variable has a different cardinality in
    ///   each `Factor`
    pub fn product(&self, other: &Self) -> Result<Self> {
        combine(self, other, Operation::Product)
    }


    /// `Factor` division. Calculates Psi(X, Y) = Phi1(X, Y) / Phi2(Y) where Phi1 = self and Phi2 =
    /// other.
    ///
    /// Defined in Koller & Friedman Section 10.3.1
    ///
    /// # Notes
    /// Any cell divided by a zero cell of `other` is 0.
    ///
    /// # Errors
    /// * `FactorError::UndefinedOperation` if the two scopes have no variable in common
    /// * `FactorError::CardinalityMismatch`, if a shared variable has a different cardinality in
    ///   each `Factor`
    pub fn divide(&self, other: &Self) -> Result<Self> {
        combine(self, other, Operation::Divide)
    }

}


/// Returns the product of all of the given `Factor`s, folded from the left.
///
/// # Errors
/// * `FactorError::EmptyProduct` if `factors` is empty
/// * any error of `Factor::product`
pub fn factor_product(factors: &[&Factor]) -> Result<Factor> {
    let (first, rest) = factors.split_first().ok_or(FactorError::EmptyProduct)?;

    rest.iter().try_fold((*first).clone(), |acc, phi| acc.product(phi))
}


fn combine(phi1: &Factor, phi2: &Factor, op: Operation) -> Result<Factor> {
    if !phi1.shape.intersects(&phi2.shape) {
        return match op {
            Operation::Product => outer_product(phi1, phi2),
            // Koller & Friedman Definition 10.7
            Operation::Divide => Err(FactorError::UndefinedOperation(format!(
                "division of factors with no common scope, {:?} and {:?}",
                phi1.scope(),
                phi2.scope()
            )))
        };
    }

    let shape = phi1.shape.union(&phi2.shape)?;
    let left = aligned_strides(&shape, &phi1.shape);
    let right = aligned_strides(&shape, &phi2.shape);

    trace!(?op, scope = ?shape.variables().collect::<Vec<_>>(), size = shape.size(), "combine");

    // every joint assignment of the union, in the union's flat order
    let values: nd::Array1<f64> = shape.states()
                                       .map(|states| {
                                           let i = offset(&states, &left);
                                           let j = offset(&states, &right);
                                           op.apply(phi1.values[i], phi2.values[j])
                                       })
                                       .collect();

    Factor::from_parts(shape, values)
}


/// With no variable in common, every pair of cells multiplies in turn over the concatenated
/// scope.
fn outer_product(phi1: &Factor, phi2: &Factor) -> Result<Factor> {
    // disjoint, so the union is the concatenation
    let shape = phi1.shape.union(&phi2.shape)?;

    trace!(scope = ?shape.variables().collect::<Vec<_>>(), size = shape.size(), "outer product");

    let values = iproduct!(phi1.values.iter(), phi2.values.iter())
        .map(|(a, b)| a * b)
        .collect();

    Factor::from_parts(shape, values)
}


/// The stride of every axis of `union` in the buffer of `operand`, or 0 for the axes `operand`
/// does not have
fn aligned_strides(union: &CardinalityVector, operand: &CardinalityVector) -> Vec<usize> {
    let strides = operand.strides();
    union.variables()
         .map(|v| operand.position(v).map_or(0, |p| strides[p]))
         .collect()
}


fn offset(states: &[usize], strides: &[usize]) -> usize {
    states.iter().zip(strides).map(|(s, k)| s * k).sum()
}


impl<'a, 'b> Mul<&'b Factor> for &'a Factor {
    type Output = Result<Factor>;

    fn mul(self, rhs: &'b Factor) -> Result<Factor> {
        self.product(rhs)
    }
}

impl<'a, 'b> Div<&'b Factor> for &'a Factor {
    type Output = Result<Factor>;

    fn div(self, rhs: &'b Factor) -> Result<Factor> {
        self.divide(rhs)
    }
}

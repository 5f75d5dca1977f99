//! Definition of the factor module
//!
//! A `Factor` (or potential) is a non-negative function over the joint states of a set of
//! discrete variables, represented as a table-CPD as described in Koller & Friedman: an ordered
//! scope with the cardinality of each variable, and a flat buffer holding one value per joint
//! assignment.
//!
//! # Layout
//! The buffer is row-major over the scope: the last variable cycles through its states the
//! fastest and the first variable the slowest. For a `Factor` over `(x1, x2, x3)`, all binary:
//!
//! | flat index | x1   | x2   | x3   |
//! |------------|------|------|------|
//! | 0          | x1_0 | x2_0 | x3_0 |
//! | 1          | x1_0 | x2_0 | x3_1 |
//! | 2          | x1_0 | x2_1 | x3_0 |
//! | ...        |      |      |      |
//! | 7          | x1_1 | x2_1 | x3_1 |

use crate::util::{FactorError, Result};
use crate::variable::{state_label, Assignment};

use ndarray::prelude as nd;
use tracing::debug;

use std::hash::{Hash, Hasher};

mod axis;
mod display;
mod ops;
mod shape;

pub use self::ops::factor_product;
pub use self::shape::{AxisSplit, CardinalityVector};

/// Alias f64 ndarray::Array as Table
pub type Table = nd::ArrayD<f64>;


#[derive(Clone, Debug)]
pub struct Factor {
    /// The scope of the `Factor` and the cardinality of each variable in it
    shape: CardinalityVector,

    /// The values of the `Factor` table, flattened in row-major order over `shape`
    values: nd::Array1<f64>
}


impl Factor {

    /// Create a new `Factor`
    ///
    /// # Args
    /// * `variables`: the scope of the `Factor`, in the order that fixes the buffer layout
    /// * `cardinalities`: the number of states of each variable
    /// * `values`: one value per joint assignment, in flat order
    ///
    /// # Errors
    /// * `FactorError::DimensionMismatch` if `variables` and `cardinalities` differ in length
    /// * `FactorError::SizeMismatch` if `values` does not hold the product of `cardinalities`
    /// * `FactorError::DuplicateVariable` if a variable appears twice in `variables`
    /// * `FactorError::InvalidCardinality` if a cardinality is zero
    /// * `FactorError::ShapeOverflow` if the product of `cardinalities` does not fit a `usize`
    pub fn new<S, V>(variables: &[S], cardinalities: &[usize], values: V) -> Result<Self>
        where S: AsRef<str>,
              V: IntoIterator<Item = f64>
    {
        let shape = CardinalityVector::new(variables, cardinalities)?;
        let values: nd::Array1<f64> = values.into_iter().collect();

        Factor::from_parts(shape, values)
    }


    /// Create a new `Factor` from a table, where the shape of the table gives the cardinality of
    /// each variable in `variables`
    pub fn from_table<S: AsRef<str>>(variables: &[S], table: &Table) -> Result<Self> {
        Factor::new(variables, table.shape(), table.iter().cloned())
    }


    pub(crate) fn from_parts(shape: CardinalityVector, values: nd::Array1<f64>) -> Result<Self> {
        if values.len() != shape.size() {
            return Err(FactorError::SizeMismatch { expected: shape.size(), actual: values.len() });
        }

        debug!(scope = ?shape.variables().collect::<Vec<_>>(), size = values.len(), "new factor");
        Ok(Factor { shape, values })
    }


    /// The multiplicative identity of this `Factor`: same scope, every value 1.
    pub fn identity_factor(&self) -> Self {
        Factor {
            shape: self.shape.clone(),
            values: nd::Array1::ones(self.values.len())
        }
    }


    /// Retrieve the scope of the `Factor`, in order
    pub fn scope(&self) -> Vec<&str> {
        self.shape.variables().collect()
    }


    /// The cardinality of every variable, in scope order
    pub fn cardinality(&self) -> Vec<usize> {
        self.shape.cardinalities()
    }


    /// The scope and cardinalities of the `Factor`
    pub fn shape(&self) -> &CardinalityVector {
        &self.shape
    }


    /// The flat value buffer
    pub fn values(&self) -> &nd::Array1<f64> {
        &self.values
    }


    /// Number of values, i.e. joint assignments, in the `Factor`
    pub fn len(&self) -> usize {
        self.values.len()
    }


    /// `true` for a `Factor` with no scope. Such a `Factor` still holds exactly one value.
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }


    /// `true` if `variable` is in the scope of the `Factor`
    pub fn contains(&self, variable: &str) -> bool {
        self.shape.contains(variable)
    }


    /// Returns the cardinality of `variable`
    ///
    /// # Errors
    /// * `FactorError::UnknownVariable` if `variable` is not in scope
    pub fn get_cardinality(&self, variable: &str) -> Result<usize> {
        self.shape.get(variable)
    }


    /// The values as a table with one axis per variable, in scope order
    ///
    /// # Errors
    /// The `Result` mirrors ndarray's fallible reshape. Every constructor checks that the buffer
    /// holds exactly the product of the cardinalities, so a `Factor` never fails here.
    pub fn to_table(&self) -> Result<Table> {
        let shape = nd::IxDyn(&self.cardinality());
        self.values
            .clone()
            .into_shape(shape)
            .map_err(|_| FactorError::SizeMismatch { expected: self.shape.size(), actual: self.len() })
    }


    /// Returns the state labels of the assignment at each of the given flat indices.
    ///
    /// ```
    /// use discrete_factor::Factor;
    ///
    /// let phi = Factor::new(&["diff", "intel"], &[2, 2], vec![1.; 4]).unwrap();
    /// assert_eq!(
    ///     vec![vec!["diff_0", "intel_1"], vec!["diff_1", "intel_0"]],
    ///     phi.assignment(&[1, 2]).unwrap()
    /// );
    /// ```
    ///
    /// # Errors
    /// * `FactorError::IndexOutOfRange` if any index is past the end of the buffer
    pub fn assignment(&self, indices: &[usize]) -> Result<Vec<Vec<String>>> {
        let states = self.assignment_states(indices)?;

        Ok(states.into_iter()
                 .map(|s| {
                     self.shape.variables()
                               .zip(s)
                               .map(|(v, i)| state_label(v, i))
                               .collect()
                 })
                 .collect())
    }


    /// Returns the state of every variable, in scope order, at each of the given flat indices
    ///
    /// # Errors
    /// * `FactorError::IndexOutOfRange` if any index is past the end of the buffer
    pub fn assignment_states(&self, indices: &[usize]) -> Result<Vec<Vec<usize>>> {
        indices.iter().map(|&i| self.shape.decode(i)).collect()
    }


    /// Retrieve the value for a complete assignment over the scope of this `Factor`
    ///
    /// # Args
    /// assignment: a full assignment to the scope of a `Factor`. The assignment's scope  may be a
    ///             superset  of the `Factor`s scope.
    ///
    /// # Errors
    /// * `FactorError::IncompleteAssignment`, if assignment is not a complete assignment to the
    ///   scope of the `Factor`
    /// * `FactorError::StateOutOfRange`, if an assigned state is not a state of its variable
    pub fn value(&self, assignment: &Assignment) -> Result<f64> {
        let missing: Vec<String> = self.shape.variables()
                                             .filter(|v| !assignment.contains_key(*v))
                                             .map(String::from)
                                             .collect();
        if !missing.is_empty() {
            return Err(FactorError::IncompleteAssignment(missing));
        }

        let mut states = Vec::with_capacity(self.shape.len());
        for (v, card) in self.shape.iter() {
            let state = assignment[v];
            if state >= card {
                return Err(FactorError::StateOutOfRange {
                    variable: String::from(v),
                    state,
                    max: card - 1
                });
            }
            states.push(state);
        }

        Ok(self.values[self.shape.encode(&states)])
    }


    /// Normalizes the values of the `Factor` in place so that they sum to 1.
    ///
    /// # Note
    /// There is no check on the total. A `Factor` that sums to 0 ends up with non-finite values;
    /// a well-formed potential always has a positive sum.
    pub fn normalize(&mut self) {
        let total = self.values.sum();
        self.values /= total;
    }


    /// Returns a normalized copy of the `Factor`. See `normalize`.
    pub fn normalized(&self) -> Self {
        let mut phi = self.clone();
        phi.normalize();
        phi
    }

}


// Exact comparison, with no floating point tolerance. A `Factor` holding NaN is not equal to
// itself.
impl PartialEq for Factor {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.values == other.values
    }
}

impl Eq for Factor {}

impl Hash for Factor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.shape.hash(state);
        for &v in self.values.iter() {
            // 0.0 == -0.0, so they must hash alike
            let v = if v == 0.0 { 0.0 } else { v };
            v.to_bits().hash(state);
        }
    }
}

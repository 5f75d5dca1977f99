//! Module containing initialization routines for the values of a `Factor`.

use crate::factor::{CardinalityVector, Factor};
use crate::util::{FactorError, Result};

use ndarray::prelude as nd;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

/// Range of the raw weights drawn by `Initialization::Random`, before normalization
const RANDOM_WEIGHTS: (f64, f64) = (1.0, 100.0);


/// Defines possible ways to initialize the values of a `Factor`.
#[derive(Clone, Debug, PartialEq)]
pub enum Initialization {
    /// Every value is 1, the multiplicative identity
    Ones,

    /// A uniform distribution over all joint assignments
    Uniform,

    /// Randomly drawn weights, normalized to sum to 1
    Random,

    /// User defined values, in flat order. Values must be finite and non-negative.
    Values(Vec<f64>)
}


impl Initialization {

    /// Construct a `Factor`, initialized based on ```self```
    ///
    /// # Args
    /// * `variables`: the scope of the `Factor`
    /// * `cardinalities`: the number of states of each variable
    ///
    /// # Errors
    /// * any error of `Factor::new`
    /// * `FactorError::InvalidInitialization` if user defined values are negative or not finite
    pub fn build<S: AsRef<str>>(self, variables: &[S], cardinalities: &[usize]) -> Result<Factor> {
        self.build_with_rng(variables, cardinalities, &mut rand::thread_rng())
    }


    /// As `build`, drawing random weights from `rng`
    pub fn build_with_rng<S, R>(self, variables: &[S], cardinalities: &[usize], rng: &mut R) -> Result<Factor>
        where S: AsRef<str>,
              R: Rng + ?Sized
    {
        let shape = CardinalityVector::new(variables, cardinalities)?;
        let size = shape.size();

        let values = match self {
            Initialization::Ones => nd::Array1::ones(size),
            Initialization::Uniform => {
                // normalizing constant is just the number of elements
                nd::Array1::from_elem(size, 1. / size as f64)
            },
            Initialization::Random => {
                let (low, high) = RANDOM_WEIGHTS;
                let tbl = nd::Array1::random_using(size, Uniform::new(low, high), rng);
                let z = tbl.sum();
                tbl / z
            },
            Initialization::Values(values) => {
                if let Some(v) = values.iter().find(|v| !v.is_finite() || **v < 0.) {
                    return Err(FactorError::InvalidInitialization(
                        format!("{} is not a finite, non-negative value", v)
                    ));
                }
                nd::Array1::from(values)
            }
        };

        Factor::from_parts(shape, values)
    }

}

//! Axis elimination: marginalization (sum an axis out) and reduction (fix an axis to one state).
//!
//! Both work directly on the flat buffer through the `AxisSplit` of the eliminated variable:
//! the buffer is `outer` repetitions of `cardinality` blocks of `inner` contiguous values, so
//! summing the blocks of each repetition marginalizes the axis and keeping one block per
//! repetition reduces it.

use super::{AxisSplit, Factor};
use crate::util::{FactorError, Result};
use crate::variable::StateToken;

use ndarray::prelude as nd;
use ndarray::s;
use tracing::debug;

use std::collections::HashSet;


impl Factor {

    /// Marginalize the `Factor` in place over the given variables.
    ///
    /// Defined in Koller & Friedman 9.3.1. The variables are summed out left to right. All of
    /// them are checked before anything is eliminated, so on error the `Factor` is unchanged.
    ///
    /// ```
    /// use discrete_factor::Factor;
    ///
    /// let mut phi = Factor::new(&["x1", "x2", "x3"], &[2, 3, 2], (0..12).map(|x| x as f64)).unwrap();
    /// phi.marginalize(&["x1", "x3"]).unwrap();
    /// assert_eq!(vec!["x2"], phi.scope());
    /// assert_eq!(&[14., 22., 30.], phi.values().as_slice().unwrap());
    /// ```
    ///
    /// # Errors
    /// * `FactorError::UnknownVariable` if a variable is not in scope, or is named a second time
    ///   after it was already eliminated
    pub fn marginalize<S: AsRef<str>>(&mut self, variables: &[S]) -> Result<()> {
        let mut seen = HashSet::new();
        for v in variables.iter().map(|v| v.as_ref()) {
            if !self.shape.contains(v) || !seen.insert(v) {
                return Err(FactorError::UnknownVariable(String::from(v)));
            }
        }

        for v in variables.iter().map(|v| v.as_ref()) {
            let split = self.shape.axis(v)?;
            debug!(variable = v, ?split, "marginalize");

            self.values = sum_axis(&self.values, &split);
            self.shape.remove(v);
        }

        Ok(())
    }


    /// Returns a copy of the `Factor` marginalized over the given variables. See `marginalize`.
    pub fn marginalized<S: AsRef<str>>(&self, variables: &[S]) -> Result<Self> {
        let mut phi = self.clone();
        phi.marginalize(variables)?;
        Ok(phi)
    }


    /// Reduce the `Factor` in place to the context of the given observations.
    ///
    /// Defined in Koller & Friedman 4.2.3. Each observation is a `variable_state` token, e.g.
    /// `x1_0`. As with `marginalize`, every token is checked before the `Factor` is touched.
    ///
    /// ```
    /// use discrete_factor::Factor;
    ///
    /// let mut phi = Factor::new(&["x1", "x2", "x3"], &[2, 3, 2], (0..12).map(|x| x as f64)).unwrap();
    /// phi.reduce(&["x1_0", "x2_0"]).unwrap();
    /// assert_eq!(vec!["x3"], phi.scope());
    /// assert_eq!(&[0., 1.], phi.values().as_slice().unwrap());
    /// ```
    ///
    /// # Errors
    /// * `FactorError::MalformedAssignment` if a token is not of the form `variable_state`
    /// * `FactorError::UnknownVariable` if a variable is not in scope, or is observed a second
    ///   time after it was already reduced away
    /// * `FactorError::StateOutOfRange` if a state is not a state of its variable
    pub fn reduce<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        let observations = tokens.iter()
                                 .map(|t| StateToken::parse(t.as_ref()))
                                 .collect::<Result<Vec<_>>>()?;
        self.reduce_observations(&observations)
    }


    /// Returns a copy of the `Factor` reduced to the given observations. See `reduce`.
    pub fn reduced<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Self> {
        let mut phi = self.clone();
        phi.reduce(tokens)?;
        Ok(phi)
    }


    /// Reduce the `Factor` in place to the given `(variable, state)` observations. See `reduce`.
    pub fn reduce_states(&mut self, observations: &[(&str, usize)]) -> Result<()> {
        let observations: Vec<StateToken> = observations.iter()
                                                        .map(|&(v, s)| StateToken::new(v, s))
                                                        .collect();
        self.reduce_observations(&observations)
    }


    /// Returns a copy of the `Factor` reduced to the given `(variable, state)` observations.
    pub fn reduced_states(&self, observations: &[(&str, usize)]) -> Result<Self> {
        let mut phi = self.clone();
        phi.reduce_states(observations)?;
        Ok(phi)
    }


    fn reduce_observations(&mut self, observations: &[StateToken]) -> Result<()> {
        let mut seen = HashSet::new();
        for obs in observations {
            let card = self.shape.get(&obs.variable)?;
            if obs.state >= card {
                return Err(FactorError::StateOutOfRange {
                    variable: obs.variable.clone(),
                    state: obs.state,
                    max: card - 1
                });
            }
            if !seen.insert(obs.variable.as_str()) {
                return Err(FactorError::UnknownVariable(obs.variable.clone()));
            }
        }

        for obs in observations {
            let split = self.shape.axis(&obs.variable)?;
            debug!(observation = %obs, ?split, "reduce");

            self.values = select_axis(&self.values, &split, obs.state);
            self.shape.remove(&obs.variable);
        }

        Ok(())
    }

}


/// Sum the blocks of every repetition of the split axis
fn sum_axis(values: &nd::Array1<f64>, split: &AxisSplit) -> nd::Array1<f64> {
    let inner = split.inner;
    let mut out = nd::Array1::zeros(split.reduced_size());

    for repeat in 0..split.outer {
        let mut dst = out.slice_mut(s![repeat * inner..(repeat + 1) * inner]);
        for state in 0..split.cardinality {
            let start = split.block_start(repeat, state);
            dst += &values.slice(s![start..start + inner]);
        }
    }

    out
}


/// Keep the block of `state` from every repetition of the split axis
fn select_axis(values: &nd::Array1<f64>, split: &AxisSplit, state: usize) -> nd::Array1<f64> {
    (0..split.outer)
        .flat_map(|repeat| {
            let start = split.block_start(repeat, state);
            values.slice(s![start..start + split.inner]).to_vec()
        })
        .collect()
}

//! Definition of the variable module
//!
//! A variable is identified by its name only; the states it can take are `0..cardinality`. The
//! human readable label of a state (`x1_0`, `x1_1`, ...) is derived on demand and never stored.

use crate::util::{FactorError, Result};

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Separates the variable name from the state index in a label
pub const STATE_SEPARATOR: char = '_';

/// A (possibly partial) assignment of states to variables, keyed by variable name
pub type Assignment = HashMap<String, usize>;


/// Label of state `index` of `variable`, e.g. `state_label("x1", 0) == "x1_0"`
pub fn state_label(variable: &str, index: usize) -> String {
    format!("{}{}{}", variable, STATE_SEPARATOR, index)
}


/// Labels of every state of `variable`, in state order
pub fn state_labels(variable: &str, cardinality: usize) -> Vec<String> {
    (0..cardinality).map(|i| state_label(variable, i)).collect()
}


/// A single observation, `variable = state`, as written in a reduction token.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StateToken {
    /// The name of the observed variable
    pub variable: String,

    /// The observed state of the variable
    pub state: usize
}

impl StateToken {

    pub fn new(variable: &str, state: usize) -> Self {
        StateToken { variable: String::from(variable), state }
    }

    /// Parse a `variable_state` token.
    ///
    /// The token is split at its last separator, so variable names may themselves contain
    /// underscores (`rain_today_1` is state 1 of `rain_today`).
    ///
    /// # Errors
    /// * `FactorError::MalformedAssignment` if the token has no separator, an empty variable
    ///   name or a state that is not a non-negative integer
    pub fn parse(token: &str) -> Result<Self> {
        let malformed = || FactorError::MalformedAssignment(String::from(token));

        let (variable, state) = token.rsplit_once(STATE_SEPARATOR).ok_or_else(malformed)?;
        if variable.is_empty() || state.is_empty() || !state.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let state = state.parse::<usize>().map_err(|_| malformed())?;
        Ok(StateToken::new(variable, state))
    }

}

impl FromStr for StateToken {
    type Err = FactorError;

    fn from_str(s: &str) -> Result<Self> {
        StateToken::parse(s)
    }
}

impl fmt::Display for StateToken {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", state_label(&self.variable, self.state))
    }

}

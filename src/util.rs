//! Defines the `Error` type for the discrete_factor library

use thiserror::Error;

use std::result;

pub type Result<T> = result::Result<T, FactorError>;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FactorError {

    /// The variable list and the cardinality list have different lengths
    #[error("Expected one cardinality per variable, got {variables} variables and {cardinalities} cardinalities")]
    DimensionMismatch { variables: usize, cardinalities: usize },

    /// The value buffer does not hold exactly one value per joint assignment
    #[error("Expected {expected} values from the cardinalities, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A variable was referenced that is not in the scope of the `Factor`
    #[error("{0} not in scope")]
    UnknownVariable(String),

    /// A shape whose number of joint assignments does not fit a `usize`
    #[error("The product of the cardinalities {0:?} overflows")]
    ShapeOverflow(Vec<usize>),

    /// A flat index past the end of the value buffer
    #[error("Index {index} greater than max possible index {max}")]
    IndexOutOfRange { index: usize, max: usize },

    /// A reduction token that is not of the form `variable_state`
    #[error("Values should be in the form of variablename_index, got {0:?}")]
    MalformedAssignment(String),

    /// A state index at or beyond the cardinality of its variable
    #[error("State {state} of {variable} is greater than max possible state {max}")]
    StateOutOfRange { variable: String, state: usize, max: usize },

    /// An operation that has no definition for the given operands, e.g. division of factors
    /// with no common scope
    #[error("Undefined operation: {0}")]
    UndefinedOperation(String),

    /// Represents a variable that was present multiple times in a situation where it should only
    /// have been present once
    #[error("The variable {0} was encountered twice")]
    DuplicateVariable(String),

    /// A variable shared by two factors with a different number of states in each
    #[error("{variable} has cardinality {left} in one factor and {right} in the other")]
    CardinalityMismatch { variable: String, left: usize, right: usize },

    /// A variable declared with no states
    #[error("The variable {0} must have a positive cardinality")]
    InvalidCardinality(String),

    /// Represents an incomplete assignment where a complete assignment was required.
    /// The value in the tuple is the names of the variables that were missing from the assignment.
    #[error("Missing assignments to the required variables: {0:?}")]
    IncompleteAssignment(Vec<String>),

    /// A product was requested over no factors at all
    #[error("A factor product requires at least one factor")]
    EmptyProduct,

    /// Represents an attempt to initialize a `Factor` with an incompatible `Initialization`
    #[error("An invalid initialization was provided: {0}")]
    InvalidInitialization(String),

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = FactorError::UnknownVariable(String::from("x4"));
        assert_eq!("x4 not in scope", e.to_string());

        let e = FactorError::IndexOutOfRange { index: 12, max: 11 };
        assert_eq!("Index 12 greater than max possible index 11", e.to_string());

        let e = FactorError::MalformedAssignment(String::from("x1"));
        assert!(e.to_string().contains("variablename_index"));
    }
}

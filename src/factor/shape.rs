//! The shape of a `Factor`: its ordered scope together with the number of states of each
//! variable, and the mixed-radix arithmetic that maps joint assignments onto a flat buffer.
//!
//! The flat layout is row-major: the last variable in scope order is the fastest varying digit
//! and the first variable is the slowest. Every stride computation in the crate goes through
//! this module.

use crate::util::{FactorError, Result};

use indexmap::IndexMap;
use itertools::Itertools;

use std::hash::{Hash, Hasher};
use std::iter;


/// Ordered `(variable, cardinality)` pairs.
#[derive(Clone, Debug, Default)]
pub struct CardinalityVector {
    /// Insertion order is scope order
    axes: IndexMap<String, usize>
}


/// Decomposition of the flat buffer around a single axis.
///
/// The buffer is `outer` repetitions of `cardinality` contiguous blocks of `inner` values. Block
/// `s` of repetition `o` starts at `o * cardinality * inner + s * inner` and holds the values
/// where the axis is in state `s`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisSplit {
    /// Position of the axis in scope order
    pub position: usize,

    /// Number of states of the axis
    pub cardinality: usize,

    /// Product of the cardinalities after the axis
    pub inner: usize,

    /// Product of the cardinalities before the axis
    pub outer: usize
}

impl AxisSplit {

    /// Offset of the block holding state `state` in repetition `repeat`
    pub fn block_start(&self, repeat: usize, state: usize) -> usize {
        (repeat * self.cardinality + state) * self.inner
    }

    /// Number of values left once the axis is eliminated
    pub fn reduced_size(&self) -> usize {
        self.outer * self.inner
    }

}


impl CardinalityVector {

    /// Build a `CardinalityVector` from parallel lists of variables and cardinalities.
    ///
    /// # Errors
    /// * `FactorError::DimensionMismatch` if the lists differ in length
    /// * `FactorError::DuplicateVariable` if a variable appears more than once
    /// * `FactorError::InvalidCardinality` if a cardinality is zero
    /// * `FactorError::ShapeOverflow` if the number of joint assignments does not fit a `usize`
    pub fn new<S: AsRef<str>>(variables: &[S], cardinalities: &[usize]) -> Result<Self> {
        if variables.len() != cardinalities.len() {
            return Err(FactorError::DimensionMismatch {
                variables: variables.len(),
                cardinalities: cardinalities.len()
            });
        }

        let mut axes = IndexMap::with_capacity(variables.len());
        for (v, &card) in variables.iter().zip(cardinalities.iter()) {
            let v = v.as_ref();
            if card == 0 {
                return Err(FactorError::InvalidCardinality(String::from(v)));
            }
            if axes.insert(String::from(v), card).is_some() {
                return Err(FactorError::DuplicateVariable(String::from(v)));
            }
        }

        CardinalityVector::checked(axes)
    }


    /// Every other product of cardinalities in this module is a factor of the total, so once
    /// the total fits a `usize` none of them overflow.
    fn checked(axes: IndexMap<String, usize>) -> Result<Self> {
        let size = axes.values().try_fold(1usize, |acc, &card| acc.checked_mul(card));
        if size.is_none() {
            return Err(FactorError::ShapeOverflow(axes.values().cloned().collect()));
        }

        Ok(CardinalityVector { axes })
    }


    /// Number of variables
    pub fn len(&self) -> usize {
        self.axes.len()
    }


    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }


    /// The variables, in scope order
    pub fn variables(&self) -> impl Iterator<Item = &str> + '_ {
        self.axes.keys().map(|v| v.as_str())
    }


    /// The cardinalities, in scope order
    pub fn cardinalities(&self) -> Vec<usize> {
        self.axes.values().cloned().collect()
    }


    /// The `(variable, cardinality)` pairs, in scope order
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.axes.iter().map(|(v, &c)| (v.as_str(), c))
    }


    pub fn contains(&self, variable: &str) -> bool {
        self.axes.contains_key(variable)
    }


    /// Position of `variable` in scope order
    pub fn position(&self, variable: &str) -> Option<usize> {
        self.axes.get_index_of(variable)
    }


    /// Cardinality of `variable`
    ///
    /// # Errors
    /// * `FactorError::UnknownVariable` if `variable` is not in scope
    pub fn get(&self, variable: &str) -> Result<usize> {
        self.axes
            .get(variable)
            .cloned()
            .ok_or_else(|| FactorError::UnknownVariable(String::from(variable)))
    }


    /// Number of joint assignments, i.e. the length of a value buffer of this shape. An empty
    /// scope has exactly one (empty) assignment.
    pub fn size(&self) -> usize {
        self.axes.values().product()
    }


    /// Place value of every axis. The last axis has stride 1 and each axis before it has the
    /// stride of its successor times the successor's cardinality.
    pub fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.len()];
        let cards = self.cardinalities();
        for i in (0..cards.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * cards[i + 1];
        }
        strides
    }


    /// The block decomposition of the buffer around `variable`
    ///
    /// # Errors
    /// * `FactorError::UnknownVariable` if `variable` is not in scope
    pub fn axis(&self, variable: &str) -> Result<AxisSplit> {
        let (position, _, &cardinality) = self.axes
            .get_full(variable)
            .ok_or_else(|| FactorError::UnknownVariable(String::from(variable)))?;

        let cards = self.cardinalities();
        let outer = cards[..position].iter().product();
        let inner = cards[position + 1..].iter().product();

        Ok(AxisSplit { position, cardinality, inner, outer })
    }


    /// Decode a flat index into the state of each variable, in scope order.
    ///
    /// The digits are resolved from the last variable to the first by repeated division.
    ///
    /// # Errors
    /// * `FactorError::IndexOutOfRange` if `index >= self.size()`
    pub fn decode(&self, index: usize) -> Result<Vec<usize>> {
        let size = self.size();
        if index >= size {
            return Err(FactorError::IndexOutOfRange { index, max: size - 1 });
        }

        let mut states = vec![0; self.len()];
        let mut rest = index;
        for (slot, &card) in states.iter_mut().rev().zip(self.axes.values().rev()) {
            *slot = rest % card;
            rest /= card;
        }

        Ok(states)
    }


    /// Encode the state of each variable, in scope order, as a flat index. Inverse of
    /// `decode`; the caller guarantees every state is within its cardinality.
    pub fn encode(&self, states: &[usize]) -> usize {
        debug_assert_eq!(states.len(), self.len());
        states.iter()
              .zip(self.axes.values())
              .fold(0, |acc, (&s, &card)| acc * card + s)
    }


    /// Every joint assignment in flat order, i.e. the `i`th item decodes flat index `i`
    pub fn states(&self) -> Box<dyn Iterator<Item = Vec<usize>> + '_> {
        if self.is_empty() {
            // a scalar has a single, empty, assignment
            return Box::new(iter::once(Vec::new()));
        }

        Box::new(self.axes.values().map(|&card| 0..card).multi_cartesian_product())
    }


    /// Drop the axis of `variable`, preserving the order of the remaining axes. Returns the
    /// cardinality of the removed axis.
    pub fn remove(&mut self, variable: &str) -> Option<usize> {
        self.axes.shift_remove(variable)
    }


    /// The scope of `self` followed by the variables of `other` that are not in `self`, in
    /// `other`'s order.
    ///
    /// # Errors
    /// * `FactorError::CardinalityMismatch` if a shared variable has different cardinalities
    /// * `FactorError::ShapeOverflow` if the union has more joint assignments than fit a `usize`
    pub fn union(&self, other: &CardinalityVector) -> Result<CardinalityVector> {
        let mut axes = self.axes.clone();
        for (v, &card) in other.axes.iter() {
            match axes.get(v) {
                Some(&mine) if mine != card => {
                    return Err(FactorError::CardinalityMismatch {
                        variable: v.clone(),
                        left: mine,
                        right: card
                    });
                },
                Some(_) => (),
                None => {
                    axes.insert(v.clone(), card);
                }
            }
        }

        CardinalityVector::checked(axes)
    }


    /// `true` if `self` and `other` share at least one variable
    pub fn intersects(&self, other: &CardinalityVector) -> bool {
        other.variables().any(|v| self.contains(v))
    }

}

// `IndexMap` compares as an unordered map, but scope order fixes the buffer layout.
impl PartialEq for CardinalityVector {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for CardinalityVector {}

impl Hash for CardinalityVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for (v, card) in self.iter() {
            v.hash(state);
            card.hash(state);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn xyz() -> CardinalityVector {
        CardinalityVector::new(&["x1", "x2", "x3"], &[2, 3, 2]).unwrap()
    }

    #[test]
    fn new() {
        let cv = xyz();
        assert_eq!(3, cv.len());
        assert_eq!(vec!["x1", "x2", "x3"], cv.variables().collect::<Vec<_>>());
        assert_eq!(vec![2, 3, 2], cv.cardinalities());
        assert_eq!(12, cv.size());
        assert_eq!(Ok(3), cv.get("x2"));
        assert_eq!(Some(2), cv.position("x3"));
    }

    #[test]
    fn new_errs() {
        let err = CardinalityVector::new(&["x1", "x2"], &[2]).unwrap_err();
        assert_eq!(FactorError::DimensionMismatch { variables: 2, cardinalities: 1 }, err);

        let err = CardinalityVector::new(&["x1", "x1"], &[2, 2]).unwrap_err();
        assert_eq!(FactorError::DuplicateVariable(String::from("x1")), err);

        let err = CardinalityVector::new(&["x1"], &[0]).unwrap_err();
        assert_eq!(FactorError::InvalidCardinality(String::from("x1")), err);
    }

    #[test]
    fn overflow() {
        let err = CardinalityVector::new(&["a", "b"], &[(1 << 62) + 1, 4]).unwrap_err();
        assert_eq!(FactorError::ShapeOverflow(vec![(1 << 62) + 1, 4]), err);

        // each half fits, the union does not
        let a = CardinalityVector::new(&["a", "b"], &[1 << 40, 2]).unwrap();
        let b = CardinalityVector::new(&["b", "c"], &[2, 1 << 40]).unwrap();
        match a.union(&b) {
            Err(FactorError::ShapeOverflow(cards)) => assert_eq!(vec![1 << 40, 2, 1 << 40], cards),
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn empty() {
        let cv = CardinalityVector::new::<&str>(&[], &[]).unwrap();
        assert_eq!(1, cv.size());
        assert!(cv.strides().is_empty());
        assert_eq!(Ok(vec![]), cv.decode(0));
        assert_eq!(vec![Vec::<usize>::new()], cv.states().collect::<Vec<_>>());
    }

    #[test]
    fn strides() {
        assert_eq!(vec![6, 2, 1], xyz().strides());
    }

    #[test]
    fn axis() {
        let cv = xyz();
        assert_eq!(AxisSplit { position: 0, cardinality: 2, inner: 6, outer: 1 }, cv.axis("x1").unwrap());
        assert_eq!(AxisSplit { position: 1, cardinality: 3, inner: 2, outer: 2 }, cv.axis("x2").unwrap());
        assert_eq!(AxisSplit { position: 2, cardinality: 2, inner: 1, outer: 6 }, cv.axis("x3").unwrap());
        assert_eq!(Err(FactorError::UnknownVariable(String::from("x4"))), cv.axis("x4"));

        let split = cv.axis("x2").unwrap();
        assert_eq!(4, split.reduced_size());
        assert_eq!(10, split.block_start(1, 2));
    }

    #[test]
    fn decode() {
        let cv = xyz();
        assert_eq!(Ok(vec![0, 0, 0]), cv.decode(0));
        assert_eq!(Ok(vec![0, 0, 1]), cv.decode(1));
        assert_eq!(Ok(vec![0, 1, 0]), cv.decode(2));
        assert_eq!(Ok(vec![1, 0, 0]), cv.decode(6));
        assert_eq!(Ok(vec![1, 2, 1]), cv.decode(11));
        assert_eq!(Err(FactorError::IndexOutOfRange { index: 12, max: 11 }), cv.decode(12));
    }

    #[test]
    fn encode_decode() {
        let cv = xyz();
        for i in 0..cv.size() {
            assert_eq!(i, cv.encode(&cv.decode(i).unwrap()));
        }
    }

    #[test]
    fn states_in_flat_order() {
        let cv = xyz();
        for (i, states) in cv.states().enumerate() {
            assert_eq!(cv.decode(i).unwrap(), states);
        }
        assert_eq!(12, cv.states().count());
    }

    #[test]
    fn remove() {
        let mut cv = xyz();
        assert_eq!(Some(3), cv.remove("x2"));
        assert_eq!(None, cv.remove("x2"));
        assert_eq!(vec!["x1", "x3"], cv.variables().collect::<Vec<_>>());
        assert_eq!(vec![2, 1], cv.strides());
    }

    #[test]
    fn union() {
        let a = xyz();
        let b = CardinalityVector::new(&["x4", "x3", "x1"], &[5, 2, 2]).unwrap();
        let u = a.union(&b).unwrap();
        assert_eq!(vec!["x1", "x2", "x3", "x4"], u.variables().collect::<Vec<_>>());
        assert_eq!(vec![2, 3, 2, 5], u.cardinalities());
        assert!(a.intersects(&b));

        let c = CardinalityVector::new(&["x3"], &[4]).unwrap();
        match a.union(&c) {
            Err(FactorError::CardinalityMismatch { variable, left, right }) => {
                assert_eq!(("x3", 2, 4), (variable.as_str(), left, right));
            },
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn ordered_equality() {
        let a = CardinalityVector::new(&["x1", "x2"], &[2, 3]).unwrap();
        let b = CardinalityVector::new(&["x2", "x1"], &[3, 2]).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}

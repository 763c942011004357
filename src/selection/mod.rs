//! Action selection under thresholded lexicographic ordering.
//!
//! - [`tlo`] - the stateless comparator and the scores derived from it
//! - [`softmax`] - Boltzmann draw used by the softmax exploration strategies
//! - [`selector`] - [`ActionSelector`], a borrowing view over a value table

pub mod selector;
pub mod softmax;
pub mod tlo;

pub use selector::ActionSelector;

//! Exact hypergeometric draw probabilities.
//!
//! - `combination`: symbolic products of factorial terms, evaluated without overflow.
//! - `draws`: "exactly n" and "at least n" draw probabilities built on top of it.

mod combination;
mod draws;

pub use combination::{Combination, n_choose_k};
pub use draws::{at_least_n, exactly_n};

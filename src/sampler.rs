//! Differentiable categorical sampling.
//!
//! Logits arrive as (batch * n_distributions, n_categories) rows. Each row
//! becomes a smoothed probability distribution, and one hard one-hot sample
//! is drawn per row with a straight-through gradient: the forward value is a
//! categorical draw, the backward pass treats the sample as the distribution
//! itself.

use crate::{
    common::*,
    dist::{Categorical, Rv},
    params,
};

/// Softmax over the category axis followed by label smoothing.
///
/// Every category keeps probability mass of at least
/// `SMOOTHING / n_categories`, so no category can go permanently dead.
pub fn smoothed_softmax(logits: &Tensor) -> Tensor {
    let (_rows, n_categories) = logits.size2().unwrap();
    let probs = logits.softmax(1, Kind::Float);
    probs * (1.0 - params::SMOOTHING) + params::SMOOTHING / n_categories as f64
}

/// Hard one-hot draw per row with an identity gradient to the distribution.
pub fn straight_through_sample(distributions: &Tensor) -> Tensor {
    let hard = Categorical::new(distributions).sample();
    (hard - distributions).detach() + distributions
}

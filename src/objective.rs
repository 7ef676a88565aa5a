use crate::{
    common::*,
    dist::{uniform_probs, Categorical, KLDiv},
};

/// Reconstruction term plus the KL regularizer on the latent code.
///
/// Binary cross-entropy matches the decoder's Sigmoid output; the KL term
/// pulls every smoothed categorical row toward the uniform distribution.
pub fn elbo(
    reconstruction: &Tensor,
    target: &Tensor,
    distributions: &Tensor,
    n_categories: i64,
) -> Tensor {
    let reconstruction_loss =
        reconstruction.binary_cross_entropy::<Tensor>(target, None, Reduction::Mean);
    reconstruction_loss + kl_to_uniform(distributions, n_categories)
}

/// Mean KL divergence from each categorical row to the uniform categorical.
pub fn kl_to_uniform(distributions: &Tensor, n_categories: i64) -> Tensor {
    let rows = distributions.view([-1, n_categories]);
    let (n_rows, _n_categories) = rows.size2().unwrap();
    let uniform = uniform_probs(n_rows, n_categories, rows.device());
    Categorical::new(&rows)
        .kl_div(&Categorical::new(&uniform))
        .mean(Kind::Float)
}

use tch::{Device, Kind, Tensor};

pub trait Rv {
    fn sample(&self) -> Tensor;
    fn log_prob(&self, value: &Tensor) -> Tensor;
}

pub trait KLDiv<R>
where
    R: Rv,
{
    fn kl_div(&self, other: &R) -> Tensor;
}

/// Batch of categorical distributions, one per row of `probs`.
pub struct Categorical<'a> {
    probs: &'a Tensor,
}

impl<'a> Categorical<'a> {
    pub fn new(probs: &'a Tensor) -> Categorical<'a> {
        Categorical { probs }
    }
}

impl<'a> Rv for Categorical<'a> {
    /// Draws one index per row and returns it as a float one-hot vector.
    fn sample(&self) -> Tensor {
        let (_rows, n_categories) = self.probs.size2().unwrap();
        self.probs
            .multinomial(1, true)
            .squeeze_dim(1)
            .one_hot(n_categories)
            .to_kind(self.probs.kind())
    }

    /// Log-probability of a one-hot valued observation, per row.
    fn log_prob(&self, value: &Tensor) -> Tensor {
        (value * self.probs.log()).sum_dim_intlist(&[1], false, Kind::Float)
    }
}

impl<'a> KLDiv<Categorical<'a>> for Categorical<'a> {
    fn kl_div(&self, other: &Categorical) -> Tensor {
        (self.probs * (self.probs.log() - other.probs.log()))
            .sum_dim_intlist(&[1], false, Kind::Float)
    }
}

/// Uniform reference rows for KL regularization.
pub fn uniform_probs(n_rows: i64, n_categories: i64, device: Device) -> Tensor {
    Tensor::ones(&[n_rows, n_categories], (Kind::Float, device)) / n_categories as f64
}

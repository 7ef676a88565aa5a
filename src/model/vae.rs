use crate::{
    common::*,
    config::ModelConfig,
    model::{
        decoder::feature_decoder,
        encoder::feature_encoder,
        layers::{mlp, Transform},
    },
    params, sampler,
    shape::ShapePlan,
};
use tch_tensor_like::TensorLike;

#[derive(Debug, TensorLike)]
pub struct VaeOutput {
    pub reconstruction: Tensor,
    pub sample: Tensor,
    pub distributions: Tensor,
}

#[derive(Debug, Clone)]
pub struct VaeInit {
    pub image_height: i64,
    pub image_width: i64,
    pub n_distributions: i64,
    pub n_categories: i64,
    pub scalings: Vec<i64>,
}

impl VaeInit {
    pub fn new(image_height: i64, image_width: i64) -> Self {
        Self {
            image_height,
            image_width,
            n_distributions: params::DEFAULT_N_DISTRIBUTIONS,
            n_categories: params::DEFAULT_N_CATEGORIES,
            scalings: params::SCALINGS.to_vec(),
        }
    }

    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            image_height: config.image_height,
            image_width: config.image_width,
            n_distributions: config.n_distributions,
            n_categories: config.n_categories,
            scalings: params::SCALINGS.to_vec(),
        }
    }

    pub fn build<'p, P>(self, path: P) -> Vae
    where
        P: Borrow<nn::Path<'p>>,
    {
        let path = path.borrow();
        let Self {
            image_height,
            image_width,
            n_distributions,
            n_categories,
            scalings,
        } = self;

        let plan = ShapePlan::new(image_height, image_width, &scalings);
        let latent_size = n_distributions * n_categories;
        let flat_size = plan.flat_size(n_distributions);
        debug!("shape plan: {:?}", plan);

        let encoder = feature_encoder(path / "encoder", &scalings, n_distributions);
        let projector = mlp(
            path / "projector",
            params::MLP_DEPTH,
            flat_size,
            latent_size,
            latent_size,
        );
        let expander = mlp(
            path / "expander",
            params::MLP_DEPTH,
            latent_size,
            latent_size,
            flat_size,
        );
        let decoder = feature_decoder(path / "decoder", &scalings, n_distributions);

        Vae {
            plan,
            n_distributions,
            n_categories,
            latent_size,
            flat_size,
            encoder,
            projector,
            expander,
            decoder,
        }
    }
}

/// Discrete-latent VAE over (batch, 1, height, width) images.
pub struct Vae {
    plan: ShapePlan,
    n_distributions: i64,
    n_categories: i64,
    latent_size: i64,
    flat_size: i64,
    encoder: Transform,
    projector: Transform,
    expander: Transform,
    decoder: Transform,
}

impl Vae {
    pub fn plan(&self) -> &ShapePlan {
        &self.plan
    }

    pub fn latent_size(&self) -> i64 {
        self.latent_size
    }

    /// Pads, encodes, and samples the latent code.
    ///
    /// Returns the straight-through sample and the smoothed distributions,
    /// both of shape (batch, latent_size).
    pub fn encode(&self, image: &Tensor, train: bool) -> (Tensor, Tensor) {
        let (batch_size, _channels, _height, _width) = image.size4().unwrap();

        let padded = self.plan.pad_input(image);
        let features = (self.encoder)(&padded, train);
        debug_assert_eq!(features.size(), &[batch_size, self.flat_size]);

        let logits = (self.projector)(&features, train)
            .view([batch_size * self.n_distributions, self.n_categories]);
        let distributions = sampler::smoothed_softmax(&logits);
        let sample = sampler::straight_through_sample(&distributions);

        (
            sample.view([batch_size, self.latent_size]),
            distributions.view([batch_size, self.latent_size]),
        )
    }

    /// Expands a (batch, latent_size) code back to the original resolution.
    pub fn decode(&self, latent: &Tensor, train: bool) -> Tensor {
        let (batch_size, _latent_size) = latent.size2().unwrap();

        let grid = (self.expander)(latent, train).view([
            batch_size,
            self.n_distributions,
            self.plan.post_conv_height,
            self.plan.post_conv_width,
        ]);
        let padded = (self.decoder)(&grid, train);
        self.plan.unpad_output(&padded)
    }

    pub fn forward_t(&self, image: &Tensor, train: bool) -> VaeOutput {
        let (sample, distributions) = self.encode(image, train);
        let reconstruction = self.decode(&sample, train);
        VaeOutput {
            reconstruction,
            sample,
            distributions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective;

    fn small_init(image_height: i64, image_width: i64) -> VaeInit {
        VaeInit {
            image_height,
            image_width,
            n_distributions: 4,
            n_categories: 8,
            scalings: vec![8, 4, 2],
        }
    }

    #[test]
    fn forward_preserves_the_image_shape() {
        let vs = VarStore::new(Device::Cpu);
        let vae = small_init(100, 130).build(&vs.root());
        assert_eq!(vae.latent_size(), 32);

        let image = Tensor::rand(&[2, 1, 100, 130], (Kind::Float, Device::Cpu));
        let VaeOutput {
            reconstruction,
            sample,
            distributions,
        } = vae.forward_t(&image, true);

        assert_eq!(reconstruction.size(), &[2, 1, 100, 130]);
        assert_eq!(sample.size(), &[2, 32]);
        assert_eq!(distributions.size(), &[2, 32]);
        assert!(reconstruction.min().double_value(&[]) >= 0.0);
        assert!(reconstruction.max().double_value(&[]) <= 1.0);
    }

    #[test]
    fn forward_works_on_pooling_aligned_images() {
        let vs = VarStore::new(Device::Cpu);
        let vae = small_init(128, 192).build(&vs.root());
        let image = Tensor::rand(&[1, 1, 128, 192], (Kind::Float, Device::Cpu));
        let output = vae.forward_t(&image, false);
        assert_eq!(output.reconstruction.size(), image.size());
    }

    #[test]
    fn encoded_sample_is_one_hot_per_distribution() {
        let vs = VarStore::new(Device::Cpu);
        let vae = small_init(100, 130).build(&vs.root());
        let image = Tensor::rand(&[3, 1, 100, 130], (Kind::Float, Device::Cpu));

        let (sample, distributions) = vae.encode(&image, true);
        let rows = sample.view([3 * 4, 8]);
        let sums = rows.sum_dim_intlist(&[1], false, Kind::Float);
        assert!((sums - 1.0).abs().max().double_value(&[]) < 1e-6);
        let (max_values, _indexes) = rows.max_dim(1, false);
        assert!((max_values - 1.0).abs().max().double_value(&[]) < 1e-6);

        let dist_sums = distributions
            .view([3 * 4, 8])
            .sum_dim_intlist(&[1], false, Kind::Float);
        assert!((dist_sums - 1.0).abs().max().double_value(&[]) < 1e-5);
    }

    #[test]
    fn decode_accepts_a_raw_distribution_code() {
        let vs = VarStore::new(Device::Cpu);
        let vae = small_init(100, 130).build(&vs.root());
        let image = Tensor::rand(&[2, 1, 100, 130], (Kind::Float, Device::Cpu));

        let (_sample, distributions) = vae.encode(&image, false);
        let reconstruction = vae.decode(&distributions, false);
        assert_eq!(reconstruction.size(), &[2, 1, 100, 130]);
    }

    #[test]
    fn elbo_of_a_forward_pass_is_finite() {
        let vs = VarStore::new(Device::Cpu);
        let vae = small_init(100, 130).build(&vs.root());
        let image = Tensor::rand(&[2, 1, 100, 130], (Kind::Float, Device::Cpu));

        let output = vae.forward_t(&image, true);
        let loss = objective::elbo(&output.reconstruction, &image, &output.distributions, 8);
        assert!(loss.double_value(&[]).is_finite());
    }
}

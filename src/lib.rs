//! Discrete-latent variational autoencoder for single-channel images.
//!
//! The latent code is a fixed number of independent categorical
//! distributions. Encoding pads the image to a pooling-friendly size, runs a
//! convolutional feature stack and an MLP projector, then draws a
//! differentiable one-hot sample per distribution with a straight-through
//! estimator. Decoding mirrors the pipeline and slices the padding back out.

pub mod common;
pub mod config;
pub mod dist;
pub mod model;
pub mod objective;
pub mod params;
pub mod sampler;
pub mod shape;

pub use model::{Vae, VaeInit, VaeOutput};
pub use shape::ShapePlan;

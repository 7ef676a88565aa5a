mod decoder;
mod encoder;
pub mod layers;
mod vae;

pub use vae::{Vae, VaeInit, VaeOutput};

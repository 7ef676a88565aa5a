//! Closure-style builders for the generic sub-transforms.

use crate::{common::*, params};

pub type Transform = Box<dyn Fn(&Tensor, bool) -> Tensor + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Sigmoid,
    None,
}

/// Spatial-size preserving convolution followed by ReLU.
pub fn conv_block<'p, P>(path: P, in_channels: i64, out_channels: i64, kernel_size: i64) -> Transform
where
    P: Borrow<nn::Path<'p>>,
{
    let conv = nn::conv2d(
        path.borrow() / "conv",
        in_channels,
        out_channels,
        kernel_size,
        nn::ConvConfig {
            padding: (kernel_size - 1) / 2,
            ..Default::default()
        },
    );

    Box::new(move |input, _train| input.apply(&conv).relu())
}

/// Transpose convolution with a selectable output activation.
pub fn deconv_block<'p, P>(
    path: P,
    in_channels: i64,
    out_channels: i64,
    kernel_size: i64,
    stride: i64,
    padding: i64,
    activation: Activation,
) -> Transform
where
    P: Borrow<nn::Path<'p>>,
{
    let deconv = nn::conv_transpose2d(
        path.borrow() / "deconv",
        in_channels,
        out_channels,
        kernel_size,
        nn::ConvTransposeConfig {
            stride,
            padding,
            ..Default::default()
        },
    );

    Box::new(move |input, _train| {
        let output = input.apply(&deconv);
        match activation {
            Activation::Relu => output.relu(),
            Activation::Sigmoid => output.sigmoid(),
            Activation::None => output,
        }
    })
}

/// Stack of `depth` linear layers with ReLU between them, none after the
/// last.
pub fn mlp<'p, P>(path: P, depth: i64, in_dim: i64, hidden_dim: i64, out_dim: i64) -> Transform
where
    P: Borrow<nn::Path<'p>>,
{
    let path = path.borrow();
    debug_assert!(depth >= 1);

    let layers: Vec<nn::Linear> = (0..depth)
        .map(|index| {
            let layer_in = if index == 0 { in_dim } else { hidden_dim };
            let layer_out = if index == depth - 1 { out_dim } else { hidden_dim };
            nn::linear(
                path / format!("linear{}", index),
                layer_in,
                layer_out,
                Default::default(),
            )
        })
        .collect();

    Box::new(move |input, _train| {
        let last = layers.len() - 1;
        layers
            .iter()
            .enumerate()
            .fold(input.shallow_clone(), |net, (index, layer)| {
                let net = net.apply(layer);
                if index == last {
                    net
                } else {
                    net.relu()
                }
            })
    })
}

/// Encoder stage output channels: the fixed widths for the early stages, the
/// latent channel count for the last one.
pub(crate) fn stage_channels(n_stages: usize, n_distributions: i64) -> Vec<i64> {
    (0..n_stages)
        .map(|index| {
            if index + 1 == n_stages {
                n_distributions
            } else {
                params::ENC_CHANNELS[index.min(params::ENC_CHANNELS.len() - 1)]
            }
        })
        .collect()
}

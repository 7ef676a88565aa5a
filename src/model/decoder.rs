use crate::{
    common::*,
    model::layers::{deconv_block, stage_channels, Activation, Transform},
};

/// Transpose-convolutional feature decoder, the mirror of the encoder.
///
/// One transpose-conv stage per scaling factor in reverse order, each with
/// kernel = stride = factor and zero padding, walking the channel schedule
/// back down to a single image channel. The final stage is followed by a
/// Sigmoid so the padded output lands in [0, 1].
pub fn feature_decoder<'p, P>(path: P, scalings: &[i64], n_distributions: i64) -> Transform
where
    P: Borrow<nn::Path<'p>>,
{
    let path = path.borrow();
    let n_stages = scalings.len();

    // mirror of the encoder's input channels
    let encoder_out = stage_channels(n_stages, n_distributions);
    let mut out_channels = vec![1_i64];
    out_channels.extend_from_slice(&encoder_out[..n_stages - 1]);
    out_channels.reverse();

    let mut stages = Vec::with_capacity(n_stages);
    let mut in_channels = n_distributions;
    for (index, (&factor, &channels)) in izip!(scalings.iter().rev(), &out_channels).enumerate() {
        let activation = if index + 1 == n_stages {
            Activation::Sigmoid
        } else {
            Activation::Relu
        };
        stages.push(deconv_block(
            path / format!("block{}", index),
            in_channels,
            channels,
            factor,
            factor,
            0,
            activation,
        ));
        in_channels = channels;
    }

    Box::new(move |input, train| {
        stages
            .iter()
            .fold(input.shallow_clone(), |net, block| block(&net, train))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconstructs_the_padded_image_in_unit_range() {
        let vs = VarStore::new(Device::Cpu);
        let decoder = feature_decoder(&vs.root(), &[8, 4, 2], 4);
        let grid = Tensor::rand(&[2, 4, 2, 3], (Kind::Float, Device::Cpu));
        let padded = decoder(&grid, true);
        assert_eq!(padded.size(), &[2, 1, 128, 192]);
        assert!(padded.min().double_value(&[]) >= 0.0);
        assert!(padded.max().double_value(&[]) <= 1.0);
    }
}

use crate::{
    common::*,
    model::layers::{conv_block, stage_channels, Transform},
    params,
};

/// Convolutional feature encoder: one conv + non-overlapping max-pool stage
/// per scaling factor, then a flatten. Stage `i` divides the spatial size by
/// exactly `scalings[i]`; the last stage lands on `n_distributions` channels.
pub fn feature_encoder<'p, P>(path: P, scalings: &[i64], n_distributions: i64) -> Transform
where
    P: Borrow<nn::Path<'p>>,
{
    let path = path.borrow();
    let out_channels = stage_channels(scalings.len(), n_distributions);

    let mut stages = Vec::with_capacity(scalings.len());
    let mut in_channels = 1;
    for (index, (&factor, &channels)) in izip!(scalings, &out_channels).enumerate() {
        let block = conv_block(
            path / format!("block{}", index),
            in_channels,
            channels,
            params::CONV_KERNEL_SIZE,
        );
        stages.push((block, factor));
        in_channels = channels;
    }

    Box::new(move |input, train| {
        let mut net = input.shallow_clone();
        for (block, factor) in &stages {
            net = block(&net, train);
            net = net.max_pool2d(&[*factor, *factor], &[*factor, *factor], &[0, 0], &[1, 1], false);
        }
        net.flatten(1, -1)
    })
}

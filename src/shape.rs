use crate::common::*;

/// Padding and spatial-size bookkeeping for a fixed downsampling schedule.
///
/// The padded dimensions are the smallest multiples of the product of all
/// scaling factors that cover the image, so the image survives the pooling
/// stack and its transposed mirror without losing rows or columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapePlan {
    pub image_height: i64,
    pub image_width: i64,
    pub total_scaling: i64,
    pub padded_height: i64,
    pub padded_width: i64,
    pub pad_top: i64,
    pub pad_bottom: i64,
    pub pad_left: i64,
    pub pad_right: i64,
    pub post_conv_height: i64,
    pub post_conv_width: i64,
}

impl ShapePlan {
    pub fn new(image_height: i64, image_width: i64, scalings: &[i64]) -> Self {
        let total_scaling: i64 = scalings.iter().product();
        let padded_height = (image_height + total_scaling - 1) / total_scaling * total_scaling;
        let padded_width = (image_width + total_scaling - 1) / total_scaling * total_scaling;

        // total pad split as floor/ceil halves
        let pad_height = padded_height - image_height;
        let pad_width = padded_width - image_width;
        let pad_top = pad_height / 2;
        let pad_bottom = pad_height - pad_top;
        let pad_left = pad_width / 2;
        let pad_right = pad_width - pad_left;

        Self {
            image_height,
            image_width,
            total_scaling,
            padded_height,
            padded_width,
            pad_top,
            pad_bottom,
            pad_left,
            pad_right,
            post_conv_height: padded_height / total_scaling,
            post_conv_width: padded_width / total_scaling,
        }
    }

    /// Flattened size of the post-conv grid for the given channel count.
    pub fn flat_size(&self, channels: i64) -> i64 {
        channels * self.post_conv_height * self.post_conv_width
    }

    /// Zero-pads an image batch up to the padded spatial size.
    pub fn pad_input(&self, image: &Tensor) -> Tensor {
        image.constant_pad_nd(&[self.pad_left, self.pad_right, self.pad_top, self.pad_bottom])
    }

    /// Slices the original rows and columns back out of a padded batch.
    ///
    /// A full-length narrow is the identity view, so the zero-pad case needs
    /// no special handling.
    pub fn unpad_output(&self, image: &Tensor) -> Tensor {
        image
            .narrow(2, self.pad_top, self.image_height)
            .narrow(3, self.pad_left, self.image_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_dims_are_tight_multiples() {
        for &(height, width) in &[(100, 130), (64, 64), (1, 1), (128, 192), (65, 63), (129, 191)] {
            let plan = ShapePlan::new(height, width, &[8, 4, 2]);
            assert_eq!(plan.padded_height % plan.total_scaling, 0);
            assert_eq!(plan.padded_width % plan.total_scaling, 0);
            assert!(plan.padded_height - plan.total_scaling < height);
            assert!(height <= plan.padded_height);
            assert!(plan.padded_width - plan.total_scaling < width);
            assert!(width <= plan.padded_width);
            assert_eq!(plan.pad_top + plan.pad_bottom, plan.padded_height - height);
            assert_eq!(plan.pad_left + plan.pad_right, plan.padded_width - width);
            assert_eq!(plan.post_conv_height * plan.total_scaling, plan.padded_height);
            assert_eq!(plan.post_conv_width * plan.total_scaling, plan.padded_width);
        }
    }

    #[test]
    fn worked_example_100x130() {
        let plan = ShapePlan::new(100, 130, &[8, 4, 2]);
        assert_eq!(plan.total_scaling, 64);
        assert_eq!(plan.padded_height, 128);
        assert_eq!(plan.padded_width, 192);
        assert_eq!(plan.pad_top, 14);
        assert_eq!(plan.pad_bottom, 14);
        assert_eq!(plan.pad_left, 31);
        assert_eq!(plan.pad_right, 31);
        assert_eq!(plan.post_conv_height, 2);
        assert_eq!(plan.post_conv_width, 3);
        assert_eq!(plan.flat_size(4), 24);
    }

    #[test]
    fn pad_then_unpad_restores_the_image() {
        let plan = ShapePlan::new(100, 130, &[8, 4, 2]);
        let image = Tensor::rand(&[2, 1, 100, 130], (Kind::Float, Device::Cpu));
        let padded = plan.pad_input(&image);
        assert_eq!(padded.size(), &[2, 1, 128, 192]);
        let unpadded = plan.unpad_output(&padded);
        assert_eq!(unpadded.size(), image.size());
        assert_eq!((unpadded - &image).abs().max().double_value(&[]), 0.0);
    }

    #[test]
    fn aligned_dims_make_padding_a_noop() {
        let plan = ShapePlan::new(128, 192, &[8, 4, 2]);
        assert_eq!(plan.pad_top + plan.pad_bottom + plan.pad_left + plan.pad_right, 0);

        let image = Tensor::rand(&[1, 1, 128, 192], (Kind::Float, Device::Cpu));
        let padded = plan.pad_input(&image);
        assert_eq!(padded.size(), image.size());
        assert_eq!((plan.unpad_output(&padded) - &image).abs().max().double_value(&[]), 0.0);
    }
}

// latent code geometry
pub const DEFAULT_N_DISTRIBUTIONS: i64 = 16; // independent categorical variables
pub const DEFAULT_N_CATEGORIES: i64 = 32; // categories per variable

// hyper-parameters: feature pipeline
pub const SCALINGS: [i64; 3] = [8, 4, 2]; // down/upsampling factors, encoder order
pub const ENC_CHANNELS: [i64; 2] = [64, 256]; // conv stage widths before the latent stage
pub const CONV_KERNEL_SIZE: i64 = 3;
pub const MLP_DEPTH: i64 = 3;

// hyper-parameters: categorical sampler
pub const SMOOTHING: f64 = 0.01; // uniform mass mixed into every categorical row

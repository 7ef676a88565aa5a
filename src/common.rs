pub use anyhow::{anyhow, bail, Result};
pub use argh::FromArgs;
pub use image::GrayImage;
pub use itertools::izip;
pub use log::{debug, info, warn};
pub use serde::{de::Error as DeserializeError, Deserialize, Deserializer, Serialize, Serializer};
pub use std::{
    borrow::Borrow,
    fs,
    path::{Path, PathBuf},
};
pub use tch::{
    nn::{self, VarStore},
    Device, Kind, Reduction, Tensor,
};

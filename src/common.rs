pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use itertools::Itertools as _;
pub use log::{info, warn};
pub use noisy_float::prelude::*;
pub use serde::{
    de::Error as _, Deserialize, Deserializer, Serialize,
};
pub use std::{
    fmt::Debug,
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};
pub use tch::{Device, IndexOp, Kind, Tensor};

//! Run configuration: typed model, environment overrides, and resolution.

mod env;
mod model;
mod resolver;
mod value;

pub use env::{
    ENV_ARCHIVE, ENV_BASE_CMD, ENV_DESTINATION, ENV_FORMAT, ENV_PLAYLIST_END, ENV_QUALITY,
    EnvironmentOverride,
};
pub use model::{DEFAULT_BASE_CMD, GlobalConfig, StreamConfig, StreamOverrides};
pub use resolver::{ConfigResolver, ResolvedOptions, ResolvedOptionsBuilder};
pub use value::Scalar;

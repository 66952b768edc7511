//! Manifest-driven batch download orchestration.
//!
//! A YAML manifest lists global download options and a sequence of streams.
//! Each stream is merged with the global options (stream value, then
//! `PITUBE_*` environment override, then manifest default), rendered into an
//! invocation of an external `youtube-dl` compatible tool, and run in order.

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod manifest;
pub mod pipeline;

pub use command::{CommandBuilder, Invocation};
pub use config::{
    ConfigResolver, EnvironmentOverride, GlobalConfig, ResolvedOptions, Scalar, StreamConfig,
    StreamOverrides,
};
pub use dispatcher::{
    DispatchOptions, DispatchSummary, Dispatcher, ProcessRunner, StreamOutcome, StreamReport,
    ToolRunner,
};
pub use error::{Error, Result};
pub use manifest::{HttpManifestFetcher, ManifestFetcher, ManifestParser, ManifestSource};
pub use pipeline::Pipeline;

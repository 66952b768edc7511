//! Typed run configuration.

use serde::Deserialize;

use super::value::{Scalar, non_empty};

/// Tool invoked when the manifest does not name one.
pub const DEFAULT_BASE_CMD: &str = "youtube-dl";

/// Default option set applied to every stream unless overridden.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    /// Output filename template, appended to the destination directory.
    pub format: Scalar,
    /// Destination directory.
    pub destination: Scalar,
    /// Download-archive file path.
    pub archive: Scalar,
    /// Quality selector passed to `-f`.
    pub quality: Scalar,
    /// Playlist-end limit.
    pub playlist_end: Scalar,
    /// Name of the external download tool.
    pub base_cmd: String,
    /// Streams in manifest order.
    pub streams: Vec<StreamConfig>,
}

/// One download target.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamConfig {
    pub name: String,
    pub url: String,
    pub overrides: StreamOverrides,
}

impl StreamConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            overrides: StreamOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: StreamOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Per-stream overrides. `None` (or an empty string) inherits the global value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamOverrides {
    #[serde(default)]
    pub format: Option<Scalar>,
    #[serde(default)]
    pub destination: Option<Scalar>,
    #[serde(default)]
    pub archive: Option<Scalar>,
    #[serde(default)]
    pub quality: Option<Scalar>,
    #[serde(default)]
    pub playlist_end: Option<Scalar>,
}

impl StreamOverrides {
    /// Layer `top` over `self`: every non-empty field of `top` wins.
    pub fn layered(&self, top: &StreamOverrides) -> StreamOverrides {
        fn pick(base: &Option<Scalar>, top: &Option<Scalar>) -> Option<Scalar> {
            non_empty(top.as_ref())
                .or_else(|| non_empty(base.as_ref()))
                .cloned()
        }

        StreamOverrides {
            format: pick(&self.format, &top.format),
            destination: pick(&self.destination, &top.destination),
            archive: pick(&self.archive, &top.archive),
            quality: pick(&self.quality, &top.quality),
            playlist_end: pick(&self.playlist_end, &top.playlist_end),
        }
    }

    /// Whether no field carries a usable value.
    pub fn is_empty(&self) -> bool {
        [
            &self.format,
            &self.destination,
            &self.archive,
            &self.quality,
            &self.playlist_end,
        ]
        .into_iter()
        .all(|v| non_empty(v.as_ref()).is_none())
    }

    pub fn with_format(mut self, value: impl Into<Scalar>) -> Self {
        self.format = Some(value.into());
        self
    }

    pub fn with_destination(mut self, value: impl Into<Scalar>) -> Self {
        self.destination = Some(value.into());
        self
    }

    pub fn with_archive(mut self, value: impl Into<Scalar>) -> Self {
        self.archive = Some(value.into());
        self
    }

    pub fn with_quality(mut self, value: impl Into<Scalar>) -> Self {
        self.quality = Some(value.into());
        self
    }

    pub fn with_playlist_end(mut self, value: impl Into<Scalar>) -> Self {
        self.playlist_end = Some(value.into());
        self
    }
}

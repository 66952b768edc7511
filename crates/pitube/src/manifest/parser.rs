//! Manifest decoding.

use serde::Deserialize;
use tracing::debug;

use crate::config::{DEFAULT_BASE_CMD, GlobalConfig, Scalar, StreamConfig, StreamOverrides};
use crate::{Error, Result};

/// Top-level manifest document.
#[derive(Debug, Deserialize)]
struct ManifestDocument {
    options: ManifestOptions,
    streams: Vec<ManifestStream>,
}

#[derive(Debug, Deserialize)]
struct ManifestOptions {
    format: Scalar,
    destination: Scalar,
    archive: Scalar,
    quality: Scalar,
    playlist_end: Scalar,
    #[serde(default)]
    base_cmd: Option<String>,
}

/// A stream entry. Overrides may sit directly on the entry or inside a
/// nested `options` mapping; the nested mapping wins.
#[derive(Debug, Deserialize)]
struct ManifestStream {
    name: String,
    url: String,
    #[serde(default)]
    options: Option<StreamOverrides>,
    #[serde(flatten)]
    flat: StreamOverrides,
}

impl From<ManifestStream> for StreamConfig {
    fn from(stream: ManifestStream) -> Self {
        let overrides = match &stream.options {
            Some(nested) => stream.flat.layered(nested),
            None => stream.flat,
        };
        StreamConfig::new(stream.name, stream.url).with_overrides(overrides)
    }
}

/// Decodes manifest bytes into a [`GlobalConfig`].
pub struct ManifestParser;

impl ManifestParser {
    /// Parse raw manifest bytes.
    ///
    /// Fails with [`Error::Parse`] when the bytes are not UTF-8, not YAML, or
    /// lack a required key. Unknown keys are ignored.
    pub fn parse(bytes: &[u8]) -> Result<GlobalConfig> {
        debug!("decoding config");
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::parse(format!("manifest is not valid UTF-8: {e}")))?;
        debug!("manifest contents:\n{}", text);

        debug!("parsing config YAML");
        let document: ManifestDocument = serde_yaml::from_str(text)?;

        let ManifestOptions {
            format,
            destination,
            archive,
            quality,
            playlist_end,
            base_cmd,
        } = document.options;

        let base_cmd = base_cmd
            .filter(|cmd| !cmd.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_CMD.to_string());

        let streams: Vec<StreamConfig> = document.streams.into_iter().map(Into::into).collect();
        debug!("parsed {} streams", streams.len());

        Ok(GlobalConfig {
            format,
            destination,
            archive,
            quality,
            playlist_end,
            base_cmd,
            streams,
        })
    }
}

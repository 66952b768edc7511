//! Per-stream configuration resolution.
//!
//! Resolution merges two layers:
//! 1. Global config (manifest defaults, already carrying environment overrides)
//! 2. Stream overrides (win whenever present and non-empty)

use tracing::debug;

use super::model::{GlobalConfig, StreamConfig, StreamOverrides};
use super::value::{Scalar, non_empty};

/// Fully resolved option set for one stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub name: String,
    pub url: String,
    pub format: Scalar,
    pub destination: Scalar,
    pub archive: Scalar,
    pub quality: Scalar,
    pub playlist_end: Scalar,
    pub base_cmd: String,
}

impl ResolvedOptions {
    pub fn builder() -> ResolvedOptionsBuilder {
        ResolvedOptionsBuilder::default()
    }
}

/// Layered builder for [`ResolvedOptions`].
#[derive(Debug, Default)]
pub struct ResolvedOptionsBuilder {
    name: String,
    url: String,
    format: Option<Scalar>,
    destination: Option<Scalar>,
    archive: Option<Scalar>,
    quality: Option<Scalar>,
    playlist_end: Option<Scalar>,
    base_cmd: Option<String>,
}

impl ResolvedOptionsBuilder {
    /// Apply the global config as the base layer.
    pub fn with_global(mut self, global: &GlobalConfig) -> Self {
        debug!(
            "[Layer 1: Global] format={}, destination={}, archive={}, quality={}, playlist_end={}",
            global.format, global.destination, global.archive, global.quality, global.playlist_end
        );
        self.format = Some(global.format.clone());
        self.destination = Some(global.destination.clone());
        self.archive = Some(global.archive.clone());
        self.quality = Some(global.quality.clone());
        self.playlist_end = Some(global.playlist_end.clone());
        self.base_cmd = Some(global.base_cmd.clone());
        self
    }

    /// Apply a stream as the top layer.
    pub fn with_stream(mut self, stream: &StreamConfig) -> Self {
        debug!(
            "[Layer 2: Stream] Applying overrides for {} (has_overrides={})",
            stream.name,
            !stream.overrides.is_empty()
        );
        self.name = stream.name.clone();
        self.url = stream.url.clone();

        let StreamOverrides {
            format,
            destination,
            archive,
            quality,
            playlist_end,
        } = &stream.overrides;

        if let Some(v) = non_empty(format.as_ref()) {
            debug!("Stream override: format = {}", v);
            self.format = Some(v.clone());
        }
        if let Some(v) = non_empty(destination.as_ref()) {
            debug!("Stream override: destination = {}", v);
            self.destination = Some(v.clone());
        }
        if let Some(v) = non_empty(archive.as_ref()) {
            debug!("Stream override: archive = {}", v);
            self.archive = Some(v.clone());
        }
        if let Some(v) = non_empty(quality.as_ref()) {
            debug!("Stream override: quality = {}", v);
            self.quality = Some(v.clone());
        }
        if let Some(v) = non_empty(playlist_end.as_ref()) {
            debug!("Stream override: playlist_end = {}", v);
            self.playlist_end = Some(v.clone());
        }
        self
    }

    /// Build the final options. Fields no layer provided fall back to an
    /// empty string, which only happens when the global layer was skipped.
    pub fn build(self) -> ResolvedOptions {
        let empty = || Scalar::Text(String::new());
        let resolved = ResolvedOptions {
            name: self.name,
            url: self.url,
            format: self.format.unwrap_or_else(empty),
            destination: self.destination.unwrap_or_else(empty),
            archive: self.archive.unwrap_or_else(empty),
            quality: self.quality.unwrap_or_else(empty),
            playlist_end: self.playlist_end.unwrap_or_else(empty),
            base_cmd: self
                .base_cmd
                .unwrap_or_else(|| super::model::DEFAULT_BASE_CMD.to_string()),
        };

        debug!(
            "[Config Merge Complete] {}: format={}, destination={}, archive={}, quality={}, playlist_end={}",
            resolved.name,
            resolved.format,
            resolved.destination,
            resolved.archive,
            resolved.quality,
            resolved.playlist_end
        );
        resolved
    }
}

/// Resolves the effective options for each stream.
///
/// Holds no state of its own; resolving one stream never affects another.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigResolver;

impl ConfigResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, global: &GlobalConfig, stream: &StreamConfig) -> ResolvedOptions {
        debug!("Resolving config for stream: {}", stream.name);
        ResolvedOptions::builder()
            .with_global(global)
            .with_stream(stream)
            .build()
    }
}

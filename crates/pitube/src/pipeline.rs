//! One full run: fetch, parse, apply environment overrides, dispatch.

use tracing::{debug, error, info};

use crate::Result;
use crate::config::{EnvironmentOverride, GlobalConfig};
use crate::dispatcher::{DispatchSummary, Dispatcher, ToolRunner};
use crate::manifest::{ManifestFetcher, ManifestParser, ManifestSource};

pub struct Pipeline<F, L, R> {
    source: ManifestSource<F>,
    overrides: EnvironmentOverride<L>,
    dispatcher: Dispatcher<R>,
}

impl<F, L, R> Pipeline<F, L, R>
where
    F: ManifestFetcher,
    L: Fn(&str) -> Option<String>,
    R: ToolRunner,
{
    pub fn new(
        source: ManifestSource<F>,
        overrides: EnvironmentOverride<L>,
        dispatcher: Dispatcher<R>,
    ) -> Self {
        Self {
            source,
            overrides,
            dispatcher,
        }
    }

    pub fn source(&self) -> &ManifestSource<F> {
        &self.source
    }

    pub fn dispatcher(&self) -> &Dispatcher<R> {
        &self.dispatcher
    }

    /// Fetch, parse and override the manifest. No stream is touched.
    pub async fn load(&self) -> Result<GlobalConfig> {
        let bytes = self.source.fetch().await.inspect_err(|e| {
            error!("failed to load manifest: {}", e);
        })?;
        let config = ManifestParser::parse(&bytes)?;
        let (config, applied) = self.overrides.apply(config);
        debug!(
            "global options: format={}, destination={}, archive={}, quality={}, playlist_end={}, base_cmd={}, env_overrides={:?}",
            config.format,
            config.destination,
            config.archive,
            config.quality,
            config.playlist_end,
            config.base_cmd,
            applied
        );
        info!("config loaded");
        Ok(config)
    }

    /// Run every stream. Manifest errors return before any dispatch.
    pub async fn run(&self) -> Result<DispatchSummary> {
        let config = self.load().await?;
        self.dispatcher.run(&config).await
    }
}

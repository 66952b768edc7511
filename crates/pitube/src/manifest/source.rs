//! Manifest byte sources: a local override file or a remote fetch.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::{Error, Result};

/// Remote manifest fetched when no local override exists.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://rawgit.com/132nd-etcher/7c70127508cf88ccc355bfbf67e2ea3d/raw/yt.yml";

/// Local override file, looked up in the working directory.
pub const DEFAULT_LOCAL_MANIFEST: &str = "test.yml";

const USER_AGENT: &str = concat!("pitube/", env!("CARGO_PKG_VERSION"));

/// Fetches manifest bytes by URL.
#[async_trait]
pub trait ManifestFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Unauthenticated HTTP GET, no retries.
pub struct HttpManifestFetcher {
    client: reqwest::Client,
}

impl HttpManifestFetcher {
    /// Build a fetcher. `timeout` of `None` (or zero) waits indefinitely.
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        install_rustls_provider();

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout.filter(|t| !t.is_zero()) {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ManifestFetcher for HttpManifestFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await.map_err(|e| {
            error!("request failed: {}", e);
            Error::fetch(url, e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let err = Error::http_status(url, status);
            error!("request failed: {}", err);
            return Err(err);
        }

        let bytes = response.bytes().await?;
        debug!(url = %url, bytes = bytes.len(), "manifest downloaded");
        Ok(bytes.to_vec())
    }
}

/// Resolves raw manifest bytes.
pub struct ManifestSource<F> {
    url: String,
    local_path: PathBuf,
    fetcher: F,
}

impl<F: ManifestFetcher> ManifestSource<F> {
    pub fn new(url: impl Into<String>, local_path: impl Into<PathBuf>, fetcher: F) -> Result<Self> {
        let url = url.into();
        url::Url::parse(&url)
            .map_err(|e| Error::config(format!("invalid manifest URL `{url}`: {e}")))?;

        Ok(Self {
            url,
            local_path: local_path.into(),
            fetcher,
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Return the local override when it exists, the remote manifest otherwise.
    pub async fn fetch(&self) -> Result<Vec<u8>> {
        info!("loading config");
        if tokio::fs::try_exists(&self.local_path).await? {
            warn!("using local {:?} file", self.local_path);
            return Ok(tokio::fs::read(&self.local_path).await?);
        }

        debug!("loading remote manifest from {}", self.url);
        self.fetcher.fetch(&self.url).await
    }
}

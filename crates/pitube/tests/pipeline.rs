//! End-to-end pipeline tests using a local manifest and in-process doubles
//! for the remote fetch and the download tool.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use pitube_engine::config::{ENV_FORMAT, ENV_QUALITY};
use pitube_engine::manifest::DEFAULT_MANIFEST_URL;
use pitube_engine::{
    DispatchOptions, Dispatcher, EnvironmentOverride, Error, Invocation, ManifestFetcher,
    ManifestSource, Pipeline, Result, Scalar, ToolRunner,
};
use reqwest::StatusCode;
use tempfile::TempDir;

const EXAMPLE: &str = r#"
options:
  format: best
  destination: /out
  archive: /out/arc.txt
  quality: 1
  playlist_end: 5
streams:
  - name: demo
    url: http://x/1
"#;

struct StubFetcher {
    calls: AtomicUsize,
    response: std::result::Result<&'static str, StatusCode>,
}

impl StubFetcher {
    fn serving(body: &'static str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: Ok(body),
        }
    }

    fn failing(status: StatusCode) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: Err(status),
        }
    }
}

#[async_trait]
impl ManifestFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.response {
            Ok(body) => Ok(body.as_bytes().to_vec()),
            Err(status) => Err(Error::http_status(url, status)),
        }
    }
}

#[derive(Default)]
struct RecordingRunner {
    calls: Mutex<Vec<Invocation>>,
}

impl RecordingRunner {
    fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for RecordingRunner {
    async fn run(&self, invocation: &Invocation) -> Result<()> {
        self.calls.lock().unwrap().push(invocation.clone());
        Ok(())
    }
}

fn env(vars: &[(&str, &str)]) -> EnvironmentOverride<impl Fn(&str) -> Option<String> + use<>> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    EnvironmentOverride::with_lookup(move |name: &str| map.get(name).cloned())
}

fn pipeline_with(
    local: &Path,
    fetcher: StubFetcher,
    vars: &[(&str, &str)],
) -> Pipeline<StubFetcher, impl Fn(&str) -> Option<String> + use<>, RecordingRunner> {
    let source = ManifestSource::new(DEFAULT_MANIFEST_URL, local, fetcher).unwrap();
    Pipeline::new(source, env(vars), Dispatcher::new(RecordingRunner::default()))
}

#[cfg(unix)]
#[tokio::test]
async fn example_manifest_end_to_end() {
    let dir = TempDir::new().unwrap();
    let local = dir.path().join("test.yml");
    std::fs::write(&local, EXAMPLE).unwrap();

    let pipeline = pipeline_with(&local, StubFetcher::serving(""), &[]);
    let config = pipeline.load().await.unwrap();
    assert_eq!(config.format, Scalar::from("best"));
    assert_eq!(config.destination, Scalar::from("/out"));
    assert_eq!(config.archive, Scalar::from("/out/arc.txt"));
    assert_eq!(config.quality, Scalar::Integer(1));
    assert_eq!(config.playlist_end, Scalar::Integer(5));

    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.completed(), 1);

    let calls = pipeline.dispatcher().runner().calls();
    assert_eq!(calls.len(), 1);
    let invocation = &calls[0];
    assert_eq!(invocation.stream, "demo");
    assert_eq!(invocation.url(), Some("http://x/1"));

    let line = invocation.command_line();
    assert!(line.starts_with("youtube-dl -o "));
    assert!(line.contains("/out"));
    assert!(line.contains("--download-archive"));
    assert!(line.contains("/out/arc.txt"));
    assert!(line.contains("-f 1 --playlist-end 5"));
}

#[tokio::test]
async fn local_override_prevents_remote_fetch() {
    let dir = TempDir::new().unwrap();
    let local = dir.path().join("test.yml");
    std::fs::write(&local, EXAMPLE).unwrap();

    let pipeline = pipeline_with(
        &local,
        StubFetcher::failing(StatusCode::INTERNAL_SERVER_ERROR),
        &[],
    );
    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.completed(), 1);
    assert_eq!(pipeline.source().fetcher().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn remote_manifest_used_without_local_file() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(&dir.path().join("test.yml"), StubFetcher::serving(EXAMPLE), &[]);

    let summary = pipeline.run().await.unwrap();
    assert_eq!(summary.completed(), 1);
    assert_eq!(pipeline.source().fetcher().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fetch_failure_dispatches_nothing() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(
        &dir.path().join("test.yml"),
        StubFetcher::failing(StatusCode::NOT_FOUND),
        &[],
    );

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, Error::Fetch { .. }));
    assert!(err.is_manifest_error());
    assert!(pipeline.dispatcher().runner().calls().is_empty());
}

#[tokio::test]
async fn parse_failure_dispatches_nothing() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(
        &dir.path().join("test.yml"),
        StubFetcher::serving("streams: []\n"),
        &[],
    );

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert!(pipeline.dispatcher().runner().calls().is_empty());
}

#[tokio::test]
async fn environment_precedence() {
    let manifest: &'static str = r#"
options: {format: best, destination: /out, archive: /out/arc.txt, quality: 1, playlist_end: 5}
streams:
  - {name: plain, url: "http://x/plain"}
  - {name: pinned, url: "http://x/pinned", format: "Y", quality: 720}
"#;
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(
        &dir.path().join("test.yml"),
        StubFetcher::serving(manifest),
        &[(ENV_FORMAT, "X"), (ENV_QUALITY, "bestaudio")],
    );

    pipeline.run().await.unwrap();
    let calls = pipeline.dispatcher().runner().calls();
    let args: Vec<Vec<&str>> = calls.iter().map(|c| c.args().collect()).collect();

    // env beats the manifest default
    assert!(Path::new(args[0][1]).ends_with("out/X"));
    assert_eq!(args[0][5], "bestaudio");
    // stream beats env
    assert!(Path::new(args[1][1]).ends_with("out/Y"));
    assert_eq!(args[1][5], "720");
}

#[tokio::test]
async fn dispatch_order_follows_manifest() {
    let manifest: &'static str = r#"
options: {format: f, destination: /d, archive: /d/a.txt, quality: best, playlist_end: 1}
streams:
  - {name: a, url: "http://x/a"}
  - {name: b, url: "http://x/b"}
  - {name: c, url: "http://x/c"}
"#;
    let dir = TempDir::new().unwrap();
    let source = ManifestSource::new(
        DEFAULT_MANIFEST_URL,
        dir.path().join("test.yml"),
        StubFetcher::serving(manifest),
    )
    .unwrap();
    let dispatcher = Dispatcher::new(RecordingRunner::default()).with_options(DispatchOptions {
        fail_fast: true,
        dry_run: false,
    });
    let pipeline = Pipeline::new(source, env(&[]), dispatcher);

    pipeline.run().await.unwrap();
    let names: Vec<_> = pipeline
        .dispatcher()
        .runner()
        .calls()
        .into_iter()
        .map(|c| c.stream)
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

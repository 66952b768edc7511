//! Library target for the `pitube` package.
//!
//! The primary deliverable of this package is the `pitube` CLI binary
//! (`src/main.rs`). This library exists so CI can run `cargo test -p pitube --doc`.

#[doc(hidden)]
pub use pitube_engine;

//! Manifest retrieval and decoding.

mod parser;
mod source;

pub use parser::ManifestParser;
pub use source::{
    DEFAULT_LOCAL_MANIFEST, DEFAULT_MANIFEST_URL, HttpManifestFetcher, ManifestFetcher,
    ManifestSource,
};

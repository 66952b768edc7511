//! Environment-variable overrides for the global configuration.
//!
//! Only [`GlobalConfig`] fields are touched; stream overrides always win over
//! whatever is applied here.

use tracing::{debug, warn};

use super::model::GlobalConfig;
use super::value::Scalar;

pub const ENV_FORMAT: &str = "PITUBE_FORMAT";
pub const ENV_DESTINATION: &str = "PITUBE_DESTINATION";
pub const ENV_ARCHIVE: &str = "PITUBE_ARCHIVE";
pub const ENV_QUALITY: &str = "PITUBE_QUALITY";
pub const ENV_PLAYLIST_END: &str = "PITUBE_PLAYLIST_END";
pub const ENV_BASE_CMD: &str = "PITUBE_BASE_CMD";

type Setter = fn(&mut GlobalConfig, String);

fn set_format(config: &mut GlobalConfig, value: String) {
    config.format = Scalar::Text(value);
}

fn set_destination(config: &mut GlobalConfig, value: String) {
    config.destination = Scalar::Text(value);
}

fn set_archive(config: &mut GlobalConfig, value: String) {
    config.archive = Scalar::Text(value);
}

fn set_quality(config: &mut GlobalConfig, value: String) {
    config.quality = Scalar::Text(value);
}

fn set_playlist_end(config: &mut GlobalConfig, value: String) {
    config.playlist_end = Scalar::Text(value);
}

fn set_base_cmd(config: &mut GlobalConfig, value: String) {
    config.base_cmd = value;
}

/// Recognized variables, applied in this order.
const OVERRIDES: &[(&str, Setter)] = &[
    (ENV_FORMAT, set_format),
    (ENV_DESTINATION, set_destination),
    (ENV_ARCHIVE, set_archive),
    (ENV_QUALITY, set_quality),
    (ENV_PLAYLIST_END, set_playlist_end),
    (ENV_BASE_CMD, set_base_cmd),
];

/// Applies `PITUBE_*` variables onto a [`GlobalConfig`].
///
/// The environment is read through `lookup`, so callers (and tests) decide
/// where values come from.
pub struct EnvironmentOverride<F> {
    lookup: F,
}

impl EnvironmentOverride<fn(&str) -> Option<String>> {
    /// Read from the process environment.
    pub fn from_process() -> Self {
        fn process_lookup(name: &str) -> Option<String> {
            std::env::var(name).ok()
        }
        Self {
            lookup: process_lookup,
        }
    }
}

impl<F> EnvironmentOverride<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    /// Apply every set, non-empty variable and return the updated config
    /// together with the names that were applied.
    pub fn apply(&self, mut config: GlobalConfig) -> (GlobalConfig, Vec<&'static str>) {
        debug!("loading config from ENV variables");
        let mut applied = Vec::new();

        for (name, setter) in OVERRIDES {
            match (self.lookup)(name) {
                Some(value) if !value.is_empty() => {
                    warn!("value overwritten in ENV: {}", name);
                    setter(&mut config, value);
                    applied.push(*name);
                }
                _ => {}
            }
        }

        (config, applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn global() -> GlobalConfig {
        GlobalConfig {
            format: Scalar::from("%(title)s.%(ext)s"),
            destination: Scalar::from("/out"),
            archive: Scalar::from("/out/arc.txt"),
            quality: Scalar::Integer(1),
            playlist_end: Scalar::Integer(5),
            base_cmd: "youtube-dl".to_string(),
            streams: Vec::new(),
        }
    }

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_no_variables_leaves_config_untouched() {
        let (config, applied) = EnvironmentOverride::with_lookup(lookup(&[])).apply(global());
        assert_eq!(config, global());
        assert!(applied.is_empty());
    }

    #[test]
    fn test_set_variables_override_globals() {
        let env = lookup(&[
            (ENV_FORMAT, "%(id)s.%(ext)s"),
            (ENV_QUALITY, "bestaudio"),
            (ENV_BASE_CMD, "yt-dlp"),
        ]);
        let (config, applied) = EnvironmentOverride::with_lookup(env).apply(global());

        assert_eq!(config.format, Scalar::from("%(id)s.%(ext)s"));
        assert_eq!(config.quality, Scalar::from("bestaudio"));
        assert_eq!(config.base_cmd, "yt-dlp");
        assert_eq!(config.destination, Scalar::from("/out"));
        assert_eq!(applied, vec![ENV_FORMAT, ENV_QUALITY, ENV_BASE_CMD]);
    }

    #[test]
    fn test_empty_variable_is_ignored() {
        let env = lookup(&[(ENV_ARCHIVE, "")]);
        let (config, applied) = EnvironmentOverride::with_lookup(env).apply(global());
        assert_eq!(config.archive, Scalar::from("/out/arc.txt"));
        assert!(applied.is_empty());
    }

    #[test]
    fn test_unrecognized_variables_are_ignored() {
        let env = lookup(&[("PITUBE_OUTTMPL", "x"), ("PITUBE_DOWNLOAD_ARCHIVE", "y")]);
        let (config, applied) = EnvironmentOverride::with_lookup(env).apply(global());
        assert_eq!(config, global());
        assert!(applied.is_empty());
    }

    #[test]
    fn test_quality_value_is_passed_through_unvalidated() {
        let env = lookup(&[(ENV_QUALITY, "not-a-number"), (ENV_PLAYLIST_END, "ten")]);
        let (config, _) = EnvironmentOverride::with_lookup(env).apply(global());
        assert_eq!(config.quality, Scalar::from("not-a-number"));
        assert_eq!(config.playlist_end, Scalar::from("ten"));
    }
}

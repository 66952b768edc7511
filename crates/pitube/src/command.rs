//! Download-tool invocation building.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{ResolvedOptions, Scalar};
use crate::{Error, Result};

/// One argument of an [`Invocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArg {
    value: String,
    /// Whether the rendered command line wraps the value in double quotes.
    quoted: bool,
}

impl CommandArg {
    fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for CommandArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.value.replace('"', "\\\""))
        } else {
            f.write_str(&self.value)
        }
    }
}

/// A fully built tool invocation.
///
/// The argument vector is what gets executed; [`fmt::Display`] renders the
/// equivalent shell command line for logs and dry runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Stream the invocation downloads.
    pub stream: String,
    pub program: String,
    args: Vec<CommandArg>,
}

impl Invocation {
    /// Build an invocation from unquoted arguments.
    pub fn from_args<I, S>(stream: impl Into<String>, program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            stream: stream.into(),
            program: program.into(),
            args: args.into_iter().map(CommandArg::plain).collect(),
        }
    }

    /// Argument values, unquoted, in order.
    pub fn args(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(CommandArg::value)
    }

    /// The positional URL, always the last argument.
    pub fn url(&self) -> Option<&str> {
        self.args.last().map(CommandArg::value)
    }

    pub fn command_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Renders [`ResolvedOptions`] into an [`Invocation`] of the download tool:
///
/// `<base_cmd> -o "<destination>/<format>" --download-archive "<archive>" -f <quality> --playlist-end <playlist_end> "<url>"`
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandBuilder;

impl CommandBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, options: &ResolvedOptions) -> Result<Invocation> {
        info!("Downloading: {}", options.name);

        let destination = absolute_path("destination", &options.destination)?;
        let archive = absolute_path("archive", &options.archive)?;
        let output = output_template(&destination, &options.format);

        let args = vec![
            CommandArg::plain("-o"),
            CommandArg::quoted(output),
            CommandArg::plain("--download-archive"),
            CommandArg::quoted(archive.to_string_lossy()),
            CommandArg::plain("-f"),
            CommandArg::plain(options.quality.to_string()),
            CommandArg::plain("--playlist-end"),
            CommandArg::plain(options.playlist_end.to_string()),
            CommandArg::quoted(options.url.clone()),
        ];

        let invocation = Invocation {
            stream: options.name.clone(),
            program: options.base_cmd.clone(),
            args,
        };
        debug!("command: {}", invocation);
        Ok(invocation)
    }
}

/// `<destination>/<format>` as plain text; the format is appended verbatim.
fn output_template(destination: &Path, format: &Scalar) -> String {
    let destination = destination.to_string_lossy();
    format!(
        "{}/{}",
        destination.trim_end_matches(std::path::is_separator),
        format
    )
}

/// Resolve against the working directory without touching the filesystem.
fn absolute_path(field: &str, value: &Scalar) -> Result<PathBuf> {
    let raw = value.to_string();
    if raw.is_empty() {
        return Err(Error::config(format!("{field} path is empty")));
    }
    std::path::absolute(Path::new(&raw))
        .map_err(|e| Error::config(format!("cannot resolve {field} path `{raw}`: {e}")))
}

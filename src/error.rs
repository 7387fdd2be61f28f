// src/error.rs
// =============================================================================
// Typed errors for every way a run can fail.
//
// There are three families, one per stage of the program:
// - ConfigError: the command line didn't give us enough to build a request
// - FetchError: the mirror list request itself went wrong
// - OutputError: we couldn't create or write the output file
//
// main.rs wraps these in anyhow::Error, prints them and exits with status 1.
// =============================================================================

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The selection made on the command line is incomplete.
///
/// Always raised before any network call is attempted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no protocol(s) specified")]
    NoProtocol,

    #[error("no IP version(s) specified")]
    NoIpVersion,

    #[error("no country specified")]
    EmptyCountry,

    #[error("no output file specified")]
    EmptyOutputPath,
}

/// Requesting or reading the mirror list failed.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid mirror list URL {0}")]
    InvalidBaseUrl(String),

    /// DNS, connection, TLS or transport timeout failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with something other than `text/plain`
    #[error("expected plaintext, got content type '{0}'")]
    UnexpectedContentType(String),

    /// The body stopped with a read error after `lines` lines.
    /// Only produced when the caller asks for a complete list.
    #[error("mirror list truncated after {lines} line(s): {message}")]
    Truncated { lines: usize, message: String },
}

/// Creating or writing the output file failed.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to open file '{}': {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("failed writing mirror list to '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

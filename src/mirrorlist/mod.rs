// src/mirrorlist/mod.rs
// =============================================================================
// This module fetches the Arch Linux mirror list and prepares it for saving.
//
// Submodules:
// - config: the validated request configuration (protocols, IP versions, country)
// - query: turns a config into the endpoint's query string
// - fetch: the HTTP request and content type check
// - lines: line splitting and the per-line rewrite (uncommenting servers)
//
// This file (mod.rs) re-exports the public API used by main.rs.
// =============================================================================

mod config;
mod fetch;
mod lines;
mod query;

pub use config::{FetchConfig, IpVersion, Protocol};
pub use fetch::{MirrorListFetcher, ARCHLINUX_MIRRORLIST_URL};
pub use lines::{MirrorLines, Termination};

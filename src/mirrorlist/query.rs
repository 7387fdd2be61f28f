// src/mirrorlist/query.rs
// Builds the query string the mirror list endpoint understands.

use super::config::FetchConfig;

// Produces `protocol=..&..&ip_version=..&..&country=..`
//
// Order is fixed: all protocol terms, then all IP version terms, then the
// country. The country is inserted as-is, without percent-encoding.
pub fn build_query(config: &FetchConfig) -> String {
    let mut parameters: Vec<String> = Vec::new();

    for protocol in config.protocols() {
        parameters.push(protocol.to_parameter());
    }

    for ip_version in config.ip_versions() {
        parameters.push(ip_version.to_parameter());
    }

    parameters.push(format!("country={}", config.country()));

    parameters.join("&")
}

// src/mirrorlist/config.rs
// =============================================================================
// The request configuration: which protocols, which IP versions, which country.
//
// A FetchConfig can only be built through FetchConfig::new(), which refuses
// empty selections. That way the fetcher never has to re-check its input and
// an incomplete command line is rejected before any network traffic.
//
// Rust concepts:
// - Enums with methods: each variant knows how to render itself
// - Private fields + constructor: the type can't exist in an invalid state
// =============================================================================

use crate::error::ConfigError;

/// Transport scheme of the mirrors we want listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    /// Query term for this protocol, e.g. `protocol=https`
    pub fn to_parameter(self) -> String {
        let value = match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        };
        format!("protocol={}", value)
    }
}

/// Address family of the mirrors we want listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Query term for this IP version, e.g. `ip_version=4`
    pub fn to_parameter(self) -> String {
        let value = match self {
            IpVersion::V4 => "4",
            IpVersion::V6 => "6",
        };
        format!("ip_version={}", value)
    }
}

// Validated, immutable request configuration
//
// Selections keep the order they were given in (that order shows up in the
// query string) and never contain duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    protocols: Vec<Protocol>,
    ip_versions: Vec<IpVersion>,
    country: String,
}

impl FetchConfig {
    /// Builds a config, rejecting empty selections and an empty country.
    ///
    /// Checks run in the order protocols, IP versions, country so the user
    /// always gets the same message for the same command line.
    pub fn new(
        protocols: impl IntoIterator<Item = Protocol>,
        ip_versions: impl IntoIterator<Item = IpVersion>,
        country: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let protocols = dedup_in_order(protocols);
        if protocols.is_empty() {
            return Err(ConfigError::NoProtocol);
        }

        let ip_versions = dedup_in_order(ip_versions);
        if ip_versions.is_empty() {
            return Err(ConfigError::NoIpVersion);
        }

        let country = country.into();
        if country.is_empty() {
            return Err(ConfigError::EmptyCountry);
        }

        Ok(Self {
            protocols,
            ip_versions,
            country,
        })
    }

    pub fn protocols(&self) -> &[Protocol] {
        &self.protocols
    }

    pub fn ip_versions(&self) -> &[IpVersion] {
        &self.ip_versions
    }

    pub fn country(&self) -> &str {
        &self.country
    }
}

// Keeps the first occurrence of every item
fn dedup_in_order<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

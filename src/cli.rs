// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The selection flags behave like on/off switches with a default:
//   -4            include IPv4 mirrors (on by default)
//   -4 false      leave them out
//   -6            include IPv6 mirrors (off by default)
//   -http         include HTTP mirrors (off by default)
//   -https=false  leave out HTTPS mirrors (on by default)
//
// The single-dash long spellings (-http, -https, -country DE, -out=list) are
// accepted too: normalize_args() turns them into their `--` form before clap
// sees them, since clap would otherwise read `-country` as `-c ountry`.
//
// Cli is converted once into a validated FetchConfig plus the output path;
// nothing else in the program looks at the raw arguments.
// =============================================================================

use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::mirrorlist::{FetchConfig, IpVersion, Protocol, ARCHLINUX_MIRRORLIST_URL};

/// Long flags that may also be written with a single dash
const SINGLE_DASH_LONG_FLAGS: [&str; 4] = ["http", "https", "country", "out"];

/// Log levels accepted by `--log-level`
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

#[derive(Parser, Debug)]
#[command(
    name = "arch-mirrorlist",
    version = "0.1.0",
    about = "Fetch the Arch Linux mirror list for a country and save it with all servers enabled",
    long_about = "arch-mirrorlist downloads the generated mirror list from archlinux.org, \
                  filtered by protocol, IP version and country, uncomments every `#Server` \
                  line and writes the result to a new file."
)]
pub struct Cli {
    /// Include IPv4 mirrors
    #[arg(
        short = '4',
        long = "ipv4",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub ipv4: bool,

    /// Include IPv6 mirrors
    #[arg(
        short = '6',
        long = "ipv6",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub ipv6: bool,

    /// Include HTTP mirrors
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub http: bool,

    /// Include HTTPS mirrors
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub https: bool,

    /// Mirror location as understood by archlinux.org (e.g. DE, FR, all)
    #[arg(short, long, default_value = "")]
    pub country: String,

    /// Output file; must not exist yet
    #[arg(short, long, default_value = "mirrorlist")]
    pub out: String,

    /// Request timeout in seconds (default: wait as long as it takes)
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Fail instead of saving a partial list when the download breaks off
    #[arg(long)]
    pub strict: bool,

    /// Mirror list endpoint
    #[arg(long, default_value = ARCHLINUX_MIRRORLIST_URL, hide = true)]
    pub url: String,

    /// Log verbosity: off, error, warn, info, debug or trace
    #[arg(
        long,
        default_value = "warn",
        value_name = "LEVEL",
        value_parser = LOG_LEVELS,
        ignore_case = true
    )]
    pub log_level: String,
}

impl Cli {
    // Protocols and IP versions come out in a fixed order (http before https,
    // 4 before 6), which is also the order they appear in the query.
    pub fn fetch_config(&self) -> Result<FetchConfig, ConfigError> {
        let mut protocols = Vec::new();
        if self.http {
            protocols.push(Protocol::Http);
        }
        if self.https {
            protocols.push(Protocol::Https);
        }

        let mut ip_versions = Vec::new();
        if self.ipv4 {
            ip_versions.push(IpVersion::V4);
        }
        if self.ipv6 {
            ip_versions.push(IpVersion::V6);
        }

        FetchConfig::new(protocols, ip_versions, self.country.clone())
    }

    pub fn output_path(&self) -> Result<&Path, ConfigError> {
        if self.out.is_empty() {
            return Err(ConfigError::EmptyOutputPath);
        }
        Ok(Path::new(&self.out))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            _ => log::LevelFilter::Off,
        }
    }
}

// Rewrites `-http`, `-country=DE` and friends to `--http`, `--country=DE`
//
// Everything else passes through untouched, and nothing after a bare `--`
// is rewritten.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut seen_separator = false;
    args.into_iter()
        .map(|arg| {
            let arg: OsString = arg.into();
            if seen_separator {
                return arg;
            }
            if arg == "--" {
                seen_separator = true;
                return arg;
            }
            let rewritten = arg
                .to_str()
                .filter(|text| is_single_dash_long_flag(text))
                .map(|text| format!("-{}", text));
            rewritten.map(OsString::from).unwrap_or(arg)
        })
        .collect()
}

fn is_single_dash_long_flag(arg: &str) -> bool {
    let Some(rest) = arg.strip_prefix('-') else {
        return false;
    };
    if rest.starts_with('-') {
        return false;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    SINGLE_DASH_LONG_FLAGS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["arch-mirrorlist"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(normalize_args(argv)).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-c", "DE"]);
        assert!(cli.ipv4);
        assert!(!cli.ipv6);
        assert!(!cli.http);
        assert!(cli.https);
        assert_eq!(cli.out, "mirrorlist");
        assert_eq!(cli.timeout(), None);
        assert!(!cli.strict);
        assert_eq!(cli.log_level_filter(), log::LevelFilter::Warn);

        let config = cli.fetch_config().unwrap();
        assert_eq!(config.protocols(), &[Protocol::Https]);
        assert_eq!(config.ip_versions(), &[IpVersion::V4]);
        assert_eq!(config.country(), "DE");
    }

    #[test]
    fn test_switches() {
        let cli = parse(&["-6", "--http", "-4", "false", "--country", "FR", "--out", "list"]);
        let config = cli.fetch_config().unwrap();
        assert_eq!(config.protocols(), &[Protocol::Http, Protocol::Https]);
        assert_eq!(config.ip_versions(), &[IpVersion::V6]);
        assert_eq!(cli.output_path().unwrap(), Path::new("list"));
    }

    #[test]
    fn test_no_protocol() {
        let cli = parse(&["--https", "false", "-c", "DE"]);
        assert_eq!(cli.fetch_config(), Err(ConfigError::NoProtocol));
    }

    #[test]
    fn test_no_ip_version() {
        let cli = parse(&["--ipv4=false", "-c", "DE"]);
        assert_eq!(cli.fetch_config(), Err(ConfigError::NoIpVersion));
    }

    #[test]
    fn test_missing_country() {
        let cli = parse(&[]);
        assert_eq!(cli.fetch_config(), Err(ConfigError::EmptyCountry));
    }

    #[test]
    fn test_empty_output() {
        let cli = parse(&["-c", "DE", "-o", ""]);
        assert_eq!(cli.output_path(), Err(ConfigError::EmptyOutputPath));
    }

    #[test]
    fn test_timeout_and_log_level() {
        let cli = parse(&["-c", "DE", "--timeout", "30", "--log-level", "debug", "--strict"]);
        assert_eq!(cli.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(cli.log_level_filter(), log::LevelFilter::Debug);
        assert!(cli.strict);

        let cli = parse(&["-c", "DE", "--log-level", "OFF"]);
        assert_eq!(cli.log_level_filter(), log::LevelFilter::Off);
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let result = Cli::try_parse_from(["arch-mirrorlist", "-c", "DE", "--log-level", "loud"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::InvalidValue
        );
    }

    #[test]
    fn test_single_dash_country() {
        let cli = parse(&["-country", "DE"]);
        assert_eq!(cli.country, "DE");

        let cli = parse(&["-country=DE"]);
        assert_eq!(cli.country, "DE");
    }

    #[test]
    fn test_single_dash_out() {
        let cli = parse(&["-country=DE", "-out=list"]);
        assert_eq!(cli.output_path().unwrap(), Path::new("list"));

        let cli = parse(&["-country=DE", "-out", "list"]);
        assert_eq!(cli.output_path().unwrap(), Path::new("list"));
    }

    #[test]
    fn test_single_dash_protocols() {
        let cli = parse(&["-http", "-https=false", "-country=DE"]);
        assert!(cli.http);
        assert!(!cli.https);
        let config = cli.fetch_config().unwrap();
        assert_eq!(config.protocols(), &[Protocol::Http]);

        let cli = parse(&["-https", "-country", "FR"]);
        assert!(cli.https);
    }

    #[test]
    fn test_normalize_leaves_other_args_alone() {
        let untouched = [
            "arch-mirrorlist", "-c", "DE", "-6", "--out", "x", "-o", "-", "--", "-http",
        ];
        let expected: Vec<OsString> = untouched.iter().map(OsString::from).collect();
        assert_eq!(normalize_args(untouched), expected);

        let args = normalize_args(["-country=DE", "-outfile", "-http"]);
        let expected: Vec<OsString> = ["--country=DE", "-outfile", "--http"]
            .iter()
            .map(OsString::from)
            .collect();
        assert_eq!(args, expected);
    }
}

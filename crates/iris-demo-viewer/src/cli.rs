#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo viewer.
//!
//! Parses args manually (no external dependencies) to keep the binary
//! lean.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
IrisView Demo Viewer — reference shell bootstrap

USAGE:
    iris-demo-viewer [OPTIONS]

OPTIONS:
    --path=PATH            Initial path to mount at (default: /)
    --engine-config=JSON   Engine configuration as inline JSON
                           (default: {\"decoders\": \"DICOM\", \"workerPoolSize\": 2})
    --log-format=FORMAT    Log output: 'pretty' or 'json' (default: pretty)
    --help, -h             Show this help message
    --version, -V          Show version
";

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    pub path: String,
    pub engine_config: Option<String>,
    pub log_json: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            engine_config: None,
            log_json: false,
        }
    }
}

impl Opts {
    /// Parse `std::env::args`, exiting on `--help`/`--version` or a
    /// malformed flag.
    #[must_use]
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1)) {
            Ok(opts) => opts,
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage.");
                process::exit(2);
            }
        }
    }

    fn parse_from(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut opts = Self::default();
        for arg in args {
            if arg == "--help" || arg == "-h" {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            if arg == "--version" || arg == "-V" {
                println!("iris-demo-viewer {VERSION}");
                process::exit(0);
            }
            if let Some(value) = arg.strip_prefix("--path=") {
                opts.path = value.to_string();
            } else if let Some(value) = arg.strip_prefix("--engine-config=") {
                opts.engine_config = Some(value.to_string());
            } else if let Some(value) = arg.strip_prefix("--log-format=") {
                opts.log_json = match value {
                    "json" => true,
                    "pretty" => false,
                    other => return Err(format!("unknown log format '{other}'")),
                };
            } else {
                return Err(format!("unknown option '{arg}'"));
            }
        }
        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Result<Opts, String> {
        Opts::parse_from(args.iter().map(ToString::to_string))
    }

    #[test]
    fn defaults() {
        let opts = parse(&[]).unwrap();
        assert_eq!(opts.path, "/");
        assert_eq!(opts.engine_config, None);
        assert!(!opts.log_json);
    }

    #[test]
    fn flags_parse() {
        let opts = parse(&[
            "--path=/view/42",
            "--engine-config={\"decoders\": \"DICOM\", \"workerPoolSize\": 4}",
            "--log-format=json",
        ])
        .unwrap();
        assert_eq!(opts.path, "/view/42");
        assert!(opts.engine_config.unwrap().contains("workerPoolSize"));
        assert!(opts.log_json);
    }

    #[test]
    fn unknown_flag_rejected() {
        assert!(parse(&["--nope"]).is_err());
        assert!(parse(&["--log-format=xml"]).is_err());
    }
}

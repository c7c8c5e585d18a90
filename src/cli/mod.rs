//! CLI command implementation

use anyhow::{bail, Result};
use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use std::path::PathBuf;
use tracing::info;

use crate::{ApiScanner, JsonReportGenerator, ReportGenerator};

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("apiscan")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Normalize OpenAPI/Swagger specifications for API security scanning")
            .arg(
                Arg::new("spec")
                    .short('s')
                    .long("spec")
                    .help("OpenAPI/Swagger specification file (YAML/JSON)")
                    .value_name("FILE"),
            )
            .arg(
                Arg::new("target")
                    .short('t')
                    .long("target")
                    .help("URL serving the specification document")
                    .value_name("URL"),
            )
            .group(
                ArgGroup::new("source")
                    .args(["spec", "target"])
                    .required(true),
            )
            .arg(
                Arg::new("output")
                    .short('o')
                    .long("output")
                    .help("Output directory for reports")
                    .value_name("DIR")
                    .default_value("./reports"),
            )
            .arg(
                Arg::new("format")
                    .short('f')
                    .long("format")
                    .help("Report format (json)")
                    .value_name("FORMAT")
                    .default_value("json"),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Enable verbose status output")
                    .action(ArgAction::SetTrue),
            )
    }

    /// Run the CLI application
    pub async fn run(matches: &ArgMatches) -> Result<()> {
        let verbose = matches.get_flag("verbose");
        let output_dir = matches
            .get_one::<String>("output")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./reports"));
        let format = matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("json");

        if format != "json" {
            bail!("Unsupported report format: {format}");
        }

        println!("API Security Scanner starting...");
        if verbose {
            println!("Output directory: {}", output_dir.display());
            println!("Report format: {format}");
        }

        let scanner = ApiScanner::new();
        let spec = match (
            matches.get_one::<String>("spec"),
            matches.get_one::<String>("target"),
        ) {
            (Some(path), _) => {
                if verbose {
                    println!("Loading spec from file: {path}");
                }
                scanner.load_file(path).await?
            }
            (None, Some(target)) => {
                if verbose {
                    println!("Loading spec from URL: {target}");
                }
                scanner.load_url(target).await?
            }
            (None, None) => bail!("Either --spec or --target must be provided"),
        };

        println!("Successfully loaded API specification:");
        println!("   Title: {}", spec.title);
        println!("   Version: {}", spec.version);
        println!("   Endpoints: {}", spec.endpoint_count());
        println!("   Base URL: {}", spec.base_url);

        crate::utils::ensure_directory(&output_dir)?;
        let report_file = JsonReportGenerator::new().generate(&spec, &output_dir)?;
        println!("Report written to {}", report_file.display());

        info!("load completed, ready for security scanning");
        println!("Ready for security scanning...");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_and_target_are_mutually_exclusive() {
        let result = CliApp::app().try_get_matches_from([
            "apiscan",
            "-s",
            "api.yaml",
            "-t",
            "api.example.com",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_one_source_is_required() {
        let result = CliApp::app().try_get_matches_from(["apiscan"]);
        assert!(result.is_err());
    }

    // The binary exits 1 on usage errors but 0 for help/version, keyed on
    // the error kind checked here.
    #[test]
    fn test_help_is_not_a_usage_error() {
        let err = CliApp::app()
            .try_get_matches_from(["apiscan", "--help"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);

        let err = CliApp::app().try_get_matches_from(["apiscan"]).unwrap_err();
        assert_ne!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        assert_ne!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_spec_alone_is_accepted() {
        let matches = CliApp::app()
            .try_get_matches_from(["apiscan", "--spec", "api.yaml", "-v"])
            .unwrap();
        assert_eq!(matches.get_one::<String>("spec").unwrap(), "api.yaml");
        assert!(matches.get_flag("verbose"));
        assert_eq!(matches.get_one::<String>("output").unwrap(), "./reports");
        assert_eq!(matches.get_one::<String>("format").unwrap(), "json");
    }

    #[test]
    fn test_target_alone_is_accepted() {
        let matches = CliApp::app()
            .try_get_matches_from(["apiscan", "-t", "api.example.com", "-o", "./out"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("target").unwrap(),
            "api.example.com"
        );
        assert_eq!(matches.get_one::<String>("output").unwrap(), "./out");
    }
}

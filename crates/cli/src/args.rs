//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).
//! - Does not resolve payload formats (see `commands::load`).

use app_config::ConfigFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "app-config")]
#[command(about = "Load application configuration from files, Secret Manager, or Cloud Storage", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  app-config load file .env.dev\n  app-config --output yaml load file config.local.json\n  app-config load secret --project-id my-project --secret-name app-config-env-dev --format env\n  app-config load blob --project-id my-project --bucket app-config-boilerplate --blob-name config.dev.yaml\n"
)]
pub struct Cli {
    /// Output format (json, yaml)
    #[arg(short, long, global = true, default_value = "json")]
    pub output: String,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Output file path (saves the mapping to a file instead of stdout)
    #[arg(long, global = true, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a configuration source and print its nested mapping
    Load {
        #[command(subcommand)]
        source: SourceArgs,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SourceArgs {
    /// Read a local file
    File {
        /// Path to the configuration file (e.g., .env.dev, config.local.yaml)
        path: PathBuf,

        /// Payload format (env, json, yaml); inferred from the file name when omitted
        #[arg(short, long)]
        format: Option<ConfigFormat>,
    },

    /// Fetch the latest version of a Secret Manager secret
    Secret {
        /// Google Cloud project that owns the secret
        #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
        project_id: String,

        /// Secret name (e.g., app-config-env-dev)
        #[arg(long)]
        secret_name: String,

        /// Payload format (env, json, yaml); inferred from the secret name when omitted
        #[arg(short, long)]
        format: Option<ConfigFormat>,
    },

    /// Download a Cloud Storage object
    Blob {
        /// Google Cloud project billed for the request
        #[arg(long, env = "GOOGLE_CLOUD_PROJECT")]
        project_id: String,

        /// Bucket name
        #[arg(long)]
        bucket: String,

        /// Object name within the bucket (e.g., config.dev.yaml)
        #[arg(long)]
        blob_name: String,

        /// Payload format (env, json, yaml); inferred from the object name when omitted
        #[arg(short, long)]
        format: Option<ConfigFormat>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_file_source_with_format() {
        let cli = Cli::try_parse_from(["app-config", "load", "file", "settings.conf", "--format", "yaml"])
            .unwrap();
        let Commands::Load { source } = cli.command;
        match source {
            SourceArgs::File { path, format } => {
                assert_eq!(path, PathBuf::from("settings.conf"));
                assert_eq!(format, Some(ConfigFormat::Yaml));
            }
            other => panic!("unexpected source: {other:?}"),
        }
        assert_eq!(cli.output, "json");
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "app-config",
            "load",
            "blob",
            "--project-id",
            "p",
            "--bucket",
            "b",
            "--blob-name",
            "config.yaml",
            "--output",
            "yaml",
            "--pretty",
        ])
        .unwrap();
        assert_eq!(cli.output, "yaml");
        assert!(cli.pretty);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result = Cli::try_parse_from(["app-config", "load", "file", "a.conf", "--format", "toml"]);
        assert!(result.is_err());
    }
}

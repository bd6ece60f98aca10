//! Load command implementation.
//!
//! Responsibilities:
//! - Turn source arguments into a `LoaderDescriptor`, inferring the format when omitted.
//! - Resolve the loader through the default registry and print the nested mapping.
//!
//! Does NOT handle:
//! - Deserializing into typed settings; the raw mapping is the output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use app_config::{ConfigError, ConfigFormat, GcpConfig, LoaderDescriptor, LoaderRegistry};
use tracing::info;

use crate::args::SourceArgs;
use crate::formatters::{OutputFormat, get_formatter, write_to_file};

pub fn run(
    source: SourceArgs,
    output_format: &str,
    pretty: bool,
    output_file: Option<PathBuf>,
) -> Result<()> {
    // Parse output format before touching the network
    let format = OutputFormat::from_str(output_format)?;

    let descriptor = build_descriptor(source)?;
    let registry = LoaderRegistry::with_defaults(GcpConfig::from_env()?);
    let loader = registry.get_loader(&descriptor)?;

    info!("Loading {} configuration from {}", loader.format(), loader.location());
    let config = loader.load()?;

    let output = get_formatter(format, pretty).format_config(&config)?;
    if let Some(ref path) = output_file {
        write_to_file(&output, path)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        eprintln!(
            "Configuration written to {} ({:?} format)",
            path.display(),
            format
        );
    } else {
        print!("{}", output);
    }

    Ok(())
}

/// Build the descriptor for `source`, inferring the format from its name if needed.
pub fn build_descriptor(source: SourceArgs) -> Result<LoaderDescriptor, ConfigError> {
    let descriptor = match source {
        SourceArgs::File { path, format } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            LoaderDescriptor::file(resolve_format(format, &name)?, path)
        }
        SourceArgs::Secret {
            project_id,
            secret_name,
            format,
        } => {
            let format = resolve_format(format, &secret_name)?;
            LoaderDescriptor::gcp_secret(format, secret_name, project_id)
        }
        SourceArgs::Blob {
            project_id,
            bucket,
            blob_name,
            format,
        } => {
            let format = resolve_format(format, &blob_name)?;
            LoaderDescriptor::gcp_storage(format, bucket, blob_name, project_id)
        }
    };

    descriptor.validate()?;
    Ok(descriptor)
}

fn resolve_format(explicit: Option<ConfigFormat>, name: &str) -> Result<ConfigFormat, ConfigError> {
    explicit
        .or_else(|| ConfigFormat::infer(name))
        .ok_or_else(|| ConfigError::InvalidDescriptor {
            field: "format",
            message: format!("cannot infer a format from '{name}'; pass --format env|json|yaml"),
        })
}

//! Proxy profile transformer CLI entry point.
//!
//! Reads a profile from a file or stdin, applies the configured steps and
//! writes the result to a file or stdout.

use anyhow::{Context, Result};
use clap::Parser;
use proxy_profile_transform::{DocumentFormat, ProfileTransformer};
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "proxy-profile-transform")]
#[command(
    author,
    version,
    about = "Rewrite DNS, tun and proxy lists in a proxy profile"
)]
struct Args {
    /// Transform settings file path (YAML or JSON)
    #[arg(short, long, env = "PROFILE_TRANSFORM_CONFIG")]
    config: Option<PathBuf>,

    /// Profile to transform. Reads stdin when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the result. Writes stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format. Defaults to the input's format.
    #[arg(long, value_enum)]
    format: Option<DocumentFormat>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print example configuration and exit.
    #[arg(long)]
    example_config: bool,

    /// Validate configuration and exit.
    #[arg(long)]
    validate: bool,
}

fn print_example_config() {
    let example = r#"# Profile Transform Configuration Example
version: "1"

steps:
  # Replace the profile's dns section
  dns:
    enabled: true
    # Optional replacement block; the built-in fake-ip/DoH policy when omitted
    # policy:
    #   enable: true
    #   nameserver: ["https://1.1.1.1/dns-query"]

  # Ensure a tun section exists and set its stack and NAT mode
  tun:
    enabled: true
    stack: mixed
    endpoint_independent_nat: true

  # Drop proxies by name and prune proxy-groups
  exclude:
    enabled: true
    pattern: "Premium"
    # substring | case_insensitive | regex | glob
    type: substring
    # off | named | all
    udp: named
"#;
    println!("{}", example);
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only the document
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    if args.example_config {
        print_example_config();
        return Ok(());
    }

    let transformer = match &args.config {
        Some(path) => ProfileTransformer::from_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => ProfileTransformer::default(),
    };

    if args.validate {
        info!("Configuration is valid");
        return Ok(());
    }

    let (text, input_format) = match &args.input {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read profile: {}", path.display()))?;
            (text, DocumentFormat::from_path(path))
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read profile from stdin")?;
            (text, DocumentFormat::Yaml)
        }
    };
    let output_format = args.format.unwrap_or(input_format);

    let (rendered, report) = transformer
        .transform_document(&text, input_format, output_format)
        .context("Failed to transform profile")?;

    match &args.output {
        Some(path) => std::fs::write(path, &rendered)
            .with_context(|| format!("Failed to write profile: {}", path.display()))?,
        None => std::io::stdout()
            .write_all(rendered.as_bytes())
            .context("Failed to write profile to stdout")?,
    }

    info!(
        input = ?args.input,
        output = ?args.output,
        changed = report.changed(),
        "Profile written"
    );

    Ok(())
}

// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 Waddle Social

//! Waddle IQ - inspect and transform XMPP IQ stanzas.
//!
//! Reads one `<iq/>` from a file or stdin and decodes it with the built-in
//! payload registry.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use waddle_xmpp_iq::{
    Iq, IqCodec, PayloadRegistry, StanzaError, StanzaErrorCondition, StanzaErrorType,
};

mod config;
mod summary;
mod telemetry;

use config::Config;
use summary::IqSummary;

/// Waddle IQ - XMPP IQ stanza inspector
#[derive(Parser)]
#[command(name = "waddle-iq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.config/waddle/iq.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an IQ and print a JSON summary
    Decode {
        /// Input file ("-" or absent for stdin)
        file: Option<PathBuf>,
    },
    /// Decode an IQ and write it back out
    Roundtrip {
        /// Input file ("-" or absent for stdin)
        file: Option<PathBuf>,
    },
    /// Build the error response for an IQ
    ErrorReply {
        /// Input file ("-" or absent for stdin)
        file: Option<PathBuf>,

        /// Defined condition (e.g. item-not-found)
        #[arg(long)]
        condition: StanzaErrorCondition,

        /// Error type (defaults to the condition's usual type)
        #[arg(long = "type")]
        error_type: Option<StanzaErrorType>,

        /// Human-readable text
        #[arg(long)]
        text: Option<String>,
    },
    /// List registered payload types
    Registry,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, source) = Config::load(cli.config.as_deref())?;
    telemetry::init(&config.logging)?;
    match source {
        Some(path) => debug!("Loaded configuration from {:?}", path),
        None => debug!("No config file found, using defaults"),
    }

    let registry = PayloadRegistry::with_defaults().install()?;
    let codec = IqCodec::new(config.codec, registry);

    match cli.command {
        Commands::Decode { file } => run_decode(&codec, file.as_deref()),
        Commands::Roundtrip { file } => run_roundtrip(&codec, file.as_deref()),
        Commands::ErrorReply {
            file,
            condition,
            error_type,
            text,
        } => run_error_reply(&codec, file.as_deref(), condition, error_type, text.as_deref()),
        Commands::Registry => run_registry(codec.registry()),
    }
}

fn run_decode(codec: &IqCodec, file: Option<&Path>) -> Result<()> {
    let iq = decode_input(codec, file)?;
    let summary = IqSummary::new(&iq).context("Failed to re-encode payloads")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_roundtrip(codec: &IqCodec, file: Option<&Path>) -> Result<()> {
    let iq = decode_input(codec, file)?;
    println!("{}", codec.encode(&iq).context("Failed to encode IQ")?);
    Ok(())
}

fn run_error_reply(
    codec: &IqCodec,
    file: Option<&Path>,
    condition: StanzaErrorCondition,
    error_type: Option<StanzaErrorType>,
    text: Option<&str>,
) -> Result<()> {
    let iq = decode_input(codec, file)?;
    let reply = error_reply(&iq, condition, error_type, text);
    info!(id = %reply.id, condition = %condition, "Built error response");
    println!("{}", codec.encode(&reply).context("Failed to encode IQ")?);
    Ok(())
}

fn run_registry(registry: &Arc<PayloadRegistry>) -> Result<()> {
    for name in registry.names() {
        println!("{}", name);
    }
    Ok(())
}

/// Build the error response for `iq`, falling back to the condition's
/// default type.
fn error_reply(
    iq: &Iq,
    condition: StanzaErrorCondition,
    error_type: Option<StanzaErrorType>,
    text: Option<&str>,
) -> Iq {
    let error_type = error_type.unwrap_or_else(|| condition.default_type());
    let mut error = StanzaError::from_condition(condition, error_type);
    if let Some(text) = text {
        error = error.with_text(text);
    }
    iq.make_error_response(error)
}

fn decode_input(codec: &IqCodec, file: Option<&Path>) -> Result<Iq> {
    let input = read_input(file)?;
    codec.decode_str(&input).context("Failed to decode IQ")
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {:?}", path)),
        _ => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_error_reply_arguments() {
        let cli = Cli::parse_from([
            "waddle-iq",
            "error-reply",
            "in.xml",
            "--condition",
            "item-not-found",
            "--type",
            "wait",
        ]);

        match cli.command {
            Commands::ErrorReply {
                file,
                condition,
                error_type,
                text,
            } => {
                assert_eq!(file, Some(PathBuf::from("in.xml")));
                assert_eq!(condition, StanzaErrorCondition::ItemNotFound);
                assert_eq!(error_type, Some(StanzaErrorType::Wait));
                assert!(text.is_none());
            }
            _ => panic!("Expected error-reply command"),
        }
    }

    #[test]
    fn test_unknown_condition_is_rejected() {
        let result = Cli::try_parse_from(["waddle-iq", "error-reply", "--condition", "oops"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_reply_uses_default_type() {
        let iq = Iq::from_xml(
            "<iq type='get' id='q' from='a@example.com/x' to='b@example.com'/>",
            &PayloadRegistry::with_defaults(),
        )
        .unwrap();

        let reply = error_reply(&iq, StanzaErrorCondition::NotAuthorized, None, Some("Login"));
        let error = reply.error.as_ref().unwrap();

        assert_eq!(reply.to.as_deref(), Some("a@example.com/x"));
        assert_eq!(error.code, 401);
        assert_eq!(error.error_type, "auth");
        assert_eq!(error.reason, "not-authorized");
        assert_eq!(error.text, "Login");
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<iq type='get' id='f'/>").unwrap();

        assert_eq!(read_input(Some(file.path())).unwrap(), "<iq type='get' id='f'/>");
        assert!(read_input(Some(Path::new("/nonexistent/iq.xml"))).is_err());
    }
}

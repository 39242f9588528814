//! RustBay CLI - encode eBay Trading API requests and decode responses offline.
//!
//! # Usage
//!
//! ```text
//! echo '{"ItemID": "110"}' | rustbay encode get_item
//! rustbay decode GetItem --input response.xml --convert-integers
//! rustbay headers GeteBayOfficialTime --site-id 3
//! rustbay signin-url SESSION --param state=abc
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EBAY_DEV_ID` / `EBAY_APP_ID` / `EBAY_CERT_ID` | *(unset)* | Application keys |
//! | `EBAY_RU_NAME` | *(unset)* | RuName for the sign-in URL |
//! | `EBAY_AUTH_TOKEN` / `EBAY_OAUTH_TOKEN` | *(unset)* | User credentials |
//! | `EBAY_SITE_ID` | `0` | eBay site |
//! | `EBAY_SANDBOX` | `true` | Target the sandbox |
//! | `EBAY_CONVERT_INTEGERS` | `false` | Decode integer text as integers |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustbay_client::{Request, RequestOptions, Response};
use rustbay_core::{EbayConfig, SiteId};
use rustbay_xml::{Value, decode};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rustbay", author, version)]
#[command(about = "Encode eBay Trading API requests and decode responses")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the request document for a call, reading the input as JSON
    Encode {
        /// Call name, wire-cased or snake_case
        call: String,

        /// JSON input file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Decode a response document and print its fields as JSON
    Decode {
        /// Call name the response belongs to
        call: String,

        /// XML response file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Decode integer text as integers
        #[arg(long)]
        convert_integers: bool,

        /// Print the whole decoded document with wire-cased keys
        #[arg(long)]
        document: bool,
    },

    /// Print the HTTP headers sent with a call
    Headers {
        /// Call name, wire-cased or snake_case
        call: String,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Print the sign-in URL for user authorization
    SigninUrl {
        /// Session ID returned by GetSessionID
        session_id: String,

        /// Parameter handed back after sign-in, as key=value
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

/// Per-call overrides of the environment configuration.
#[derive(clap::Args, Debug, Default)]
struct Overrides {
    /// Auth'n'Auth token
    #[arg(long)]
    auth_token: Option<String>,

    /// OAuth token
    #[arg(long)]
    oauth_token: Option<String>,

    /// eBay site ID
    #[arg(long)]
    site_id: Option<u32>,

    /// Trading API schema version
    #[arg(long)]
    compatibility_level: Option<u32>,
}

impl From<Overrides> for RequestOptions {
    fn from(overrides: Overrides) -> Self {
        Self {
            auth_token: overrides.auth_token,
            oauth_token: overrides.oauth_token,
            site_id: overrides.site_id.map(SiteId::new),
            compatibility_level: overrides.compatibility_level,
            ..Self::default()
        }
    }
}

/// Initialize the tracing subscriber on stderr.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected key=value, got {raw:?}"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => io::read_to_string(io::stdin()).context("failed to read stdin"),
    }
}

/// Parse JSON call input; blank input means a call without parameters.
fn parse_input(text: &str) -> Result<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    let json: serde_json::Value = serde_json::from_str(text).context("input is not valid JSON")?;
    Ok(Value::from(json))
}

fn run(command: Command, config: &EbayConfig) -> Result<String> {
    match command {
        Command::Encode {
            call,
            input,
            overrides,
        } => {
            let input = parse_input(&read_input(input.as_deref())?)?;
            let request = Request::with_options(&call, input, config, overrides.into())
                .context("failed to build request")?;
            info!(command = %request.command(), uri = %request.uri(), "encoded request");
            Ok(request.body()?)
        }
        Command::Decode {
            call,
            input,
            convert_integers,
            document,
        } => {
            let body = read_input(input.as_deref())?;
            let mut options = config.decode_options();
            options.convert_integers |= convert_integers;

            if document {
                let decoded = decode(&body, &options).context("failed to decode document")?;
                return Ok(serde_json::to_string_pretty(&decoded)?);
            }

            let response =
                Response::parse(&call, body, &options).context("failed to decode response")?;
            info!(command = %response.command(), ack = ?response.ack(), "decoded response");
            Ok(serde_json::to_string_pretty(response.record())?)
        }
        Command::Headers { call, overrides } => {
            let request = Request::with_options(&call, Value::Null, config, overrides.into())
                .context("failed to build request")?;
            Ok(request
                .headers()
                .into_iter()
                .map(|(name, value)| format!("{name}: {value}"))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        Command::SigninUrl { session_id, params } => {
            let params: Vec<(&str, &str)> = params
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            Ok(config.authorization_uri(&session_id, &params))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = EbayConfig::from_env();
    init_tracing(&config.log_level, cli.json_logs)?;

    let output = run(cli.command, &config)?;
    println!("{output}");
    Ok(())
}

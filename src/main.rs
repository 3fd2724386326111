use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reqlog::{
    body,
    http_url::{HttpUrlBuilder, QueryParameters},
    logging::{Level, LoggingClient, LoggingConfig},
    utils::{
        naming::{self, NameStyle},
        ConsoleLogger,
    },
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "reqlog", version, about = "HTTP body sniffing, query canonicalization and request logging")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a file as plaintext or binary from its first bytes
    Sniff { file: PathBuf },

    /// Decode an encoded query string and print it as JSON
    Query { query: String },

    /// Rewrite the query of a URL
    Url {
        base: String,

        /// Append a parameter, `NAME=VALUE` or `NAME` for no value
        #[arg(long = "param")]
        params: Vec<String>,

        /// Replace every value of a parameter
        #[arg(long = "set")]
        sets: Vec<String>,

        /// Remove every value of a parameter
        #[arg(long = "remove")]
        removes: Vec<String>,
    },

    /// Send a GET request and log the exchange
    Fetch {
        url: String,

        /// none, basic, headers or body (defaults to REQLOG_LEVEL, then basic)
        #[arg(long)]
        level: Option<Level>,

        /// Header whose value is masked in the log
        #[arg(long = "redact")]
        redact: Vec<String>,

        /// Print exchange lines to the console instead of through tracing
        #[arg(long)]
        console: bool,
    },

    /// Convert a name to snake, camel, pascal or kebab case
    Case { style: NameStyle, name: String },
}

#[derive(Serialize)]
struct ParameterOutput<'a> {
    name: &'a str,
    values: &'a [Option<String>],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Sniff { file } => sniff(&file),
        Command::Query { query } => print_query(&query),
        Command::Url {
            base,
            params,
            sets,
            removes,
        } => rewrite_url(&base, &params, &sets, &removes),
        Command::Fetch {
            url,
            level,
            redact,
            console,
        } => fetch(&url, level, &redact, console),
        Command::Case { style, name } => {
            println!("{}", naming::convert(&name, style));
            Ok(())
        }
    }
}

fn sniff(file: &Path) -> anyhow::Result<()> {
    let prefix = body::read_prefix(file)?;
    let kind = body::classify(&prefix);

    println!("{kind}");
    if !kind.is_plaintext() {
        println!("{}", hex::encode(&prefix[..prefix.len().min(16)]));
    }
    Ok(())
}

fn print_query(query: &str) -> anyhow::Result<()> {
    let params = QueryParameters::parse(query.strip_prefix('?').unwrap_or(query));
    let output: Vec<ParameterOutput> = params
        .iter()
        .map(|(name, values)| ParameterOutput { name, values })
        .collect();
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn rewrite_url(base: &str, params: &[String], sets: &[String], removes: &[String]) -> anyhow::Result<()> {
    let mut builder = HttpUrlBuilder::parse(base).with_context(|| format!("invalid URL: {base}"))?;

    for name in removes {
        builder.remove_all_query_parameters(name);
    }
    for param in sets {
        let (name, value) = split_param(param);
        builder.set_query_parameter(name, value);
    }
    for param in params {
        let (name, value) = split_param(param);
        builder.add_query_parameter(name, value);
    }

    println!("{}", builder.build()?);
    Ok(())
}

fn fetch(url: &str, level: Option<Level>, redact: &[String], console: bool) -> anyhow::Result<()> {
    let url = Url::parse(url).with_context(|| format!("invalid URL: {url}"))?;

    let mut config = LoggingConfig::from_env()?;
    if let Some(level) = level {
        config = config.with_level(level);
    }
    for name in redact {
        config = config.redact(name)?;
    }

    let mut client = LoggingClient::from_config(&config)?;
    if console {
        client = client.with_handler(Arc::new(ConsoleLogger));
    }
    let response = client.get(url)?;
    if !response.status.is_success() {
        anyhow::bail!("server answered {}", response.status);
    }
    Ok(())
}

/// `name=value` or a bare `name` with no value.
fn split_param(param: &str) -> (&str, Option<&str>) {
    match param.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (param, None),
    }
}

//! MCP server and command-line front end for the mining statistics tools.
//!
//! With no subcommand the binary serves every tool over MCP stdio. `list`
//! prints the tool descriptors and `call` runs a single tool once.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mining_stats_async::{Client, MiningStatsConfig};
use serde::Deserialize;
use serde_json::Value as Json;
use stats_tools_core::{ToolContext, ToolRegistry};
use stats_tools_mcp::{OutputMode, RegistryServer, ServiceExt, stdio};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str = "mining_mcp=info,mining_tools=info,stats_tools_core=info";

#[derive(Parser, Debug)]
#[command(name = "mining-mcp")]
#[command(about = "Bitcoin mining statistics tools over MCP", version)]
struct Cli {
    #[command(flatten)]
    opts: Options,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args, Debug, Default)]
struct Options {
    /// Statistics API base URL (overrides MINING_STATS_BASE_URL)
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Per-request timeout in seconds (overrides MINING_STATS_TIMEOUT_SECS)
    #[arg(long, global = true, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Comma-separated allowlist. Example: mining_get_price,mining_get_hashrate
    #[arg(long, global = true, value_name = "NAMES")]
    allow: Option<String>,

    /// Output mode: text | structured (default: text)
    #[arg(long, global = true, value_parser = ["text", "structured"])]
    output: Option<String>,

    /// JSON config file with `allowlist`, `output`, `base_url` and `timeout_secs`
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Serve the tools over MCP stdio (default)
    Serve,
    /// Print the tool descriptors as JSON
    List,
    /// Run one tool and print its report
    Call {
        /// Tool name, e.g. mining_get_price
        name: String,
        /// Tool arguments as a JSON object
        #[arg(long, value_name = "JSON")]
        args: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    allowlist: Option<Vec<String>>,
    output: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Effective settings after merging the config file and the flags.
#[derive(Debug, PartialEq, Eq)]
struct Settings {
    allowlist: Option<HashSet<String>>,
    output: OutputMode,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

/// Read the config file. Unreadable or malformed files are ignored with a
/// warning so a stale config never keeps the server from starting.
fn load_file_config(path: &Path) -> FileConfig {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read config file; ignoring");
            return FileConfig::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "failed to parse config JSON; ignoring");
        FileConfig::default()
    })
}

fn parse_allowlist(raw: &str) -> Option<HashSet<String>> {
    let set: HashSet<String> = raw
        .split(',')
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    (!set.is_empty()).then_some(set)
}

/// Flags win over the config file; the config file wins over the environment.
fn resolve(opts: &Options, file: FileConfig) -> Settings {
    let allowlist = opts
        .allow
        .as_deref()
        .and_then(parse_allowlist)
        .or_else(|| {
            file.allowlist
                .map(|names| names.into_iter().collect::<HashSet<_>>())
                .filter(|set| !set.is_empty())
        });

    let output = match opts.output.as_deref().or(file.output.as_deref()) {
        None => OutputMode::Text,
        Some(raw) => raw.parse().unwrap_or_else(|e: String| {
            warn!(error = %e, "falling back to text output");
            OutputMode::Text
        }),
    };

    Settings {
        allowlist,
        output,
        base_url: opts.base_url.clone().or(file.base_url),
        timeout: opts
            .timeout_secs
            .or(file.timeout_secs)
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs),
    }
}

fn build_registry(settings: &Settings) -> anyhow::Result<ToolRegistry> {
    let mut config = MiningStatsConfig::new();
    if let Some(base) = &settings.base_url {
        config = config.with_api_base(base.clone());
    }
    if let Some(timeout) = settings.timeout {
        config = config.with_timeout(timeout);
    }
    info!(api_base = config.api_base(), "statistics API");

    let client = Client::with_config(config).context("failed to build statistics client")?;
    let registry = mining_tools::build_registry(Arc::new(client));

    if let Some(allow) = &settings.allowlist {
        let unknown: Vec<&str> = allow
            .iter()
            .map(String::as_str)
            .filter(|n| !registry.contains(n))
            .collect();
        if !unknown.is_empty() {
            warn!(?unknown, "allowlist names no registered tool");
        }
    }
    Ok(registry)
}

/// The registry as seen by `list` and `call`.
fn visible(registry: &ToolRegistry, settings: &Settings) -> ToolRegistry {
    match &settings.allowlist {
        Some(allow) => registry.subset(allow.iter().map(String::as_str)),
        None => registry.clone(),
    }
}

async fn call(
    registry: &ToolRegistry,
    output: OutputMode,
    name: &str,
    args: Option<&str>,
) -> anyhow::Result<ExitCode> {
    let args: Json = match args {
        Some(raw) => serde_json::from_str(raw).context("--args must be valid JSON")?,
        None => Json::Null,
    };

    let execution = registry.execute(name, args, &ToolContext::new()).await;
    let failed = execution.envelope.is_error;
    match output {
        OutputMode::Text => println!("{}", execution.envelope.text()),
        OutputMode::Structured => {
            let mut json = serde_json::to_value(&execution.envelope)?;
            if let (Some(obj), Some(data)) = (json.as_object_mut(), execution.data) {
                obj.insert("structuredContent".to_string(), data);
            }
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

async fn serve(registry: ToolRegistry, settings: Settings) -> anyhow::Result<()> {
    info!(
        tools = registry.len(),
        output = ?settings.output,
        "starting mining-mcp"
    );

    let mut server = RegistryServer::new(Arc::new(registry))
        .with_info("mining-mcp", env!("CARGO_PKG_VERSION"))
        .with_output_mode(settings.output);
    if let Some(allow) = settings.allowlist {
        server = server.with_allowlist(allow);
    }

    let service = server.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // stdout carries the MCP channel; logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Install the rustls CryptoProvider before any HTTP client is created.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();
    let file = cli
        .opts
        .config
        .as_deref()
        .map(load_file_config)
        .unwrap_or_default();
    let settings = resolve(&cli.opts, file);
    let registry = build_registry(&settings)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(registry, settings).await.map(|()| ExitCode::SUCCESS),
        Command::List => {
            let descriptors = visible(&registry, &settings).descriptors();
            println!("{}", serde_json::to_string_pretty(&descriptors)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Call { name, args } => {
            call(
                &visible(&registry, &settings),
                settings.output,
                &name,
                args.as_deref(),
            )
            .await
        }
    }
}

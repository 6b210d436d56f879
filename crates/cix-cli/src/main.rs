//! CIX - CI extension contracts CLI
//!
//! The `cix` command exercises build parameter conversion and status icon
//! resolution from the command line.
//!
//! ## Commands
//!
//! - `params`: Resolve a job's build parameters from `-p NAME=VALUE` tokens
//! - `icon`: Resolve a stock icon path and description
//! - `ball`: Resolve a build-status ball

mod invocation;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cix_core::telemetry::{init_tracing, LogFormat};
use cix_core::{
    BallColor, CixConfig, InvocationContext, JobParameters, Locale, Localizable, MessageBundle,
    ParameterError, ParameterValue, StatusIcon,
};
use serde::Serialize;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};

use crate::invocation::CliInvocation;

#[derive(Parser)]
#[command(name = "cix")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "CI extension contracts: build parameters and status icons", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: ./cix.toml when present)
    #[arg(long, global = true, env = "CIX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the build parameters of a job file
    Params {
        /// Job file with [[parameters]] tables
        job: PathBuf,

        /// Parameter token, repeatable
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Read this parameter's token from stdin
        #[arg(long, value_name = "NAME")]
        stdin: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Print password values in env output
        #[arg(long)]
        reveal: bool,
    },

    /// Resolve a stock icon
    Icon {
        /// Logical image token, e.g. folder.gif
        image: String,

        #[command(flatten)]
        render: RenderArgs,

        /// Message key of the description
        #[arg(long, default_value = "icon.folder")]
        description: String,

        /// Description argument, repeatable
        #[arg(long = "arg")]
        args: Vec<String>,

        /// Use the non-resolving stand-in (never yields a path)
        #[arg(long)]
        no_resolve: bool,
    },

    /// Resolve a build-status ball (red, blue_anime, ...)
    Ball {
        color: String,

        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Icon size
    #[arg(short, long, default_value = "16x16")]
    size: String,

    /// Locale for the description (default: from config)
    #[arg(short, long)]
    locale: Option<String>,

    /// Resolve as if no request were active
    #[arg(long)]
    no_request: bool,

    /// Extra message table, repeatable: LOCALE=FILE.properties
    #[arg(long = "bundle", value_name = "LOCALE=FILE", value_parser = parse_param)]
    bundles: Vec<(String, String)>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Env,
}

#[derive(Serialize)]
struct IconReport {
    image: Option<String>,
    description: String,
    locale: String,
}

fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {raw:?}")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(LogFormat::from_json_flag(cli.json), level);

    let config =
        CixConfig::load(cli.config.as_deref()).context("Failed to load CIX configuration")?;

    match cli.command {
        Commands::Params {
            job,
            params,
            stdin,
            format,
            reveal,
        } => cmd_params(&job, params, stdin, format, reveal).await,
        Commands::Icon {
            image,
            render,
            description,
            args,
            no_resolve,
        } => {
            let description = Localizable::with_args(description, args);
            let icon = if no_resolve {
                StatusIcon::non_resolving(description)
            } else {
                StatusIcon::stock(image, description)
            };
            cmd_render(&config, &icon, &render)
        }
        Commands::Ball { color, render } => {
            let ball: BallColor = color.parse()?;
            cmd_render(&config, &ball.to_status_icon(), &render)
        }
    }
}

async fn cmd_params(
    job_path: &Path,
    supplied: Vec<(String, String)>,
    stdin_param: Option<String>,
    format: OutputFormat,
    reveal: bool,
) -> Result<()> {
    let text = tokio::fs::read_to_string(job_path)
        .await
        .with_context(|| format!("Failed to read job file {}", job_path.display()))?;
    let job = JobParameters::from_toml(&text)
        .with_context(|| format!("Invalid job file {}", job_path.display()))?;
    info!(job = %job_path.display(), parameters = job.len(), "loaded job");

    let label = stdin_param.clone().unwrap_or_else(|| "<stdin>".to_string());
    let ctx = CliInvocation::new(stdin_param, std::io::stdin());

    let interrupt = tokio::signal::ctrl_c();
    let Some(values) = resolve_until_interrupted(job, ctx, supplied, interrupt).await? else {
        // the blocking stdin read cannot be cancelled, so leave now
        let err = ParameterError::Interrupted(label);
        warn!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(130);
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&values)?),
        OutputFormat::Env => {
            for value in &values {
                println!("{}", env_line(value, reveal));
            }
        }
    }
    Ok(())
}

/// Run resolution off the async workers; context reads may block on stdin.
async fn resolve_blocking<C>(
    job: JobParameters,
    ctx: C,
    supplied: Vec<(String, String)>,
) -> Result<Vec<ParameterValue>>
where
    C: InvocationContext + 'static,
{
    let values = tokio::task::spawn_blocking(move || job.resolve(&ctx, &supplied))
        .await
        .context("Parameter resolution task failed")??;
    Ok(values)
}

/// Resolve unless `interrupt` fires first. `None` means interrupted.
///
/// A failure to install the signal handler only disables interruption.
async fn resolve_until_interrupted<C, S>(
    job: JobParameters,
    ctx: C,
    supplied: Vec<(String, String)>,
    interrupt: S,
) -> Result<Option<Vec<ParameterValue>>>
where
    C: InvocationContext + 'static,
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        biased;
        Ok(()) = interrupt => Ok(None),
        resolved = resolve_blocking(job, ctx, supplied) => resolved.map(Some),
    }
}

fn env_line(value: &ParameterValue, reveal: bool) -> String {
    if reveal || !value.payload.is_sensitive() {
        let (name, value) = value.env_pair();
        format!("{name}={value}")
    } else {
        value.to_string()
    }
}

fn cmd_render(config: &CixConfig, icon: &StatusIcon, render: &RenderArgs) -> Result<()> {
    let locale: Locale = match &render.locale {
        Some(raw) => raw.parse()?,
        None => config.locale.clone(),
    };
    let bundle = load_bundle(&render.bundles)?;

    let request = config.request_context();
    let request = (!render.no_request).then_some(&request);
    let image = icon.image_of(request, &render.size)?;

    let report = IconReport {
        image,
        description: icon.description(&bundle, &locale),
        locale: locale.to_string(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn load_bundle(extra: &[(String, String)]) -> Result<MessageBundle> {
    let mut bundle = MessageBundle::builtin();
    for (tag, path) in extra {
        let locale: Locale = tag.parse()?;
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read message bundle {path}"))?;
        let count = bundle
            .load_properties(Some(&locale), &text)
            .with_context(|| format!("Invalid message bundle {path}"))?;
        info!(%locale, path = %path, count, "loaded message bundle");
    }
    Ok(bundle)
}

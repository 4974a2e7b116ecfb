//! wsdot - command-line client for the WSDOT traveler and ferries APIs.
//!
//! Response data is written to stdout; logs go to stderr.

/// Application configuration (TOML).
mod config;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use wsdot_api::{
    ApiFamily, Endpoint, Params, Strategy, WsdotClient, all_endpoints, endpoints_for,
    find_endpoint, normalize,
};

use crate::config::{ACCESS_CODE_ENV, AppConfig, mask_secret, resolve_config_path};

/// User agent sent with every request.
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// List registered endpoints.
    Endpoints(EndpointsArgs),
    /// Fetch one endpoint and print the normalized JSON.
    Fetch(FetchArgs),
    /// Poll one endpoint at its cache-strategy refetch interval.
    Watch(WatchArgs),
    /// Normalize a saved JSON response offline.
    Normalize(NormalizeArgs),
    /// Generate an OpenAPI 3.0 document for one API family.
    Openapi(OpenapiArgs),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `endpoints` subcommand.
#[derive(clap::Args)]
struct EndpointsArgs {
    /// Only list endpoints of this API family (`wsdot` or `wsf`).
    #[arg(long)]
    api: Option<ApiFamily>,
}

/// Endpoint selection shared by `fetch` and `watch`.
#[derive(clap::Args)]
struct RequestArgs {
    /// Endpoint function name, e.g. "getVesselLocations".
    function: String,

    /// Request parameter as NAME=VALUE. Repeatable.
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,

    /// Fill parameters not given with --param from the endpoint's sample values.
    #[arg(long)]
    sample: bool,

    /// Skip output-schema conformance.
    #[arg(long)]
    no_validate: bool,

    /// Transport override (`native` or `jsonp`).
    #[arg(long)]
    strategy: Option<Strategy>,
}

/// Arguments for the `fetch` subcommand.
#[derive(clap::Args)]
struct FetchArgs {
    /// Endpoint and parameters.
    #[command(flatten)]
    request: RequestArgs,

    /// Print the response body as received.
    #[arg(long)]
    raw: bool,
}

/// Arguments for the `watch` subcommand.
#[derive(clap::Args)]
struct WatchArgs {
    /// Endpoint and parameters.
    #[command(flatten)]
    request: RequestArgs,

    /// Stop after this many polls.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    count: Option<u32>,
}

/// Arguments for the `normalize` subcommand.
#[derive(clap::Args)]
struct NormalizeArgs {
    /// JSON file to normalize.
    file: PathBuf,

    /// Also conform the result to this endpoint's output schema.
    #[arg(long)]
    endpoint: Option<String>,
}

/// Arguments for the `openapi` subcommand.
#[derive(clap::Args)]
struct OpenapiArgs {
    /// API family to document.
    #[arg(long)]
    api: ApiFamily,

    /// Write the YAML to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Store the WSDOT access code in the config file.
    SetKey(SetKeyArgs),
    /// Show the effective configuration.
    Show,
}

/// Arguments for the `config set-key` subcommand.
#[derive(clap::Args)]
struct SetKeyArgs {
    /// Access code issued by WSDOT.
    key: String,
}

/// Parses a `NAME=VALUE` pair.
fn parse_param(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {s:?}"))?;
    if name.is_empty() {
        return Err(format!("empty parameter name in {s:?}"));
    }
    Ok((String::from(name), String::from(value)))
}

/// Writes one line to stdout.
fn write_stdout(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}").context("failed to write to stdout")?;
    stdout.flush().context("failed to flush stdout")
}

/// Looks up a registered endpoint by function name.
fn lookup_endpoint(function: &str) -> Result<&'static Endpoint> {
    find_endpoint(function)
        .with_context(|| format!("unknown endpoint: {function} (see `wsdot endpoints`)"))
}

/// Collects `--sample` and `--param` values and validates them.
fn build_params(endpoint: &Endpoint, args: &RequestArgs) -> Result<Params> {
    let mut params = if args.sample {
        endpoint.sample_params()
    } else {
        Params::new()
    };
    for (name, value) in &args.params {
        if endpoint.param(name).is_none() {
            tracing::warn!(
                "Ignoring parameter {name}: not declared by {}",
                endpoint.function_name
            );
        }
        params.insert(name.as_str(), value);
    }
    endpoint
        .validate_params(&params)
        .with_context(|| format!("invalid parameters for {}", endpoint.function_name))?;
    Ok(params)
}

/// Builds a [`WsdotClient`] from config and environment.
///
/// # Errors
///
/// Returns an error if no access code is available or a configured base URL
/// is invalid.
#[instrument(skip_all)]
fn build_client(
    dir: Option<&PathBuf>,
    strategy: Option<Strategy>,
    validate: bool,
) -> Result<WsdotClient> {
    let config_path = resolve_config_path(dir)?;
    let config = AppConfig::load(&config_path)?;
    let access_code = config.access_code().with_context(|| {
        format!("no access code configured: set {ACCESS_CODE_ENV} or run `wsdot config set-key <KEY>`")
    })?;

    let mut builder = WsdotClient::builder()
        .api_key(access_code)
        .user_agent(USER_AGENT)
        .validate(validate);
    if let Some(url) = config.base_url(ApiFamily::Wsdot)? {
        builder = builder.wsdot_base_url(url);
    }
    if let Some(url) = config.base_url(ApiFamily::Wsf)? {
        builder = builder.wsf_base_url(url);
    }
    if let Some(strategy) = strategy.or(config.api.strategy) {
        builder = builder.strategy(strategy);
    }
    builder.build().context("failed to build API client")
}

/// Runs the `endpoints` subcommand.
fn run_endpoints(args: &EndpointsArgs) -> Result<()> {
    let endpoints: Vec<&Endpoint> = match args.api {
        Some(family) => endpoints_for(family).iter().collect(),
        None => all_endpoints().collect(),
    };

    let mut lines = vec![format!(
        "{:<36} {:<6} {:<9} PATH",
        "FUNCTION", "API", "CACHE"
    )];
    lines.extend(endpoints.iter().map(|e| {
        format!(
            "{:<36} {:<6} {:<9} {}",
            e.function_name,
            e.api.as_str(),
            e.cache.as_str(),
            e.path_template
        )
    }));
    write_stdout(&lines.join("\n"))?;
    tracing::info!("Total: {} endpoints", endpoints.len());
    Ok(())
}

/// Runs the `fetch` subcommand.
#[instrument(skip_all, fields(function = %args.request.function))]
async fn run_fetch(args: &FetchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let endpoint = lookup_endpoint(&args.request.function)?;
    let params = build_params(endpoint, &args.request)?;
    let client = build_client(dir, args.request.strategy, !args.request.no_validate)?;

    let output = if args.raw {
        client
            .fetch_text(endpoint, &params)
            .await
            .with_context(|| format!("{} request failed", endpoint.function_name))?
    } else {
        let value = client
            .fetch(endpoint, &params)
            .await
            .with_context(|| format!("{} request failed", endpoint.function_name))?;
        serde_json::to_string_pretty(&value).context("failed to serialize response")?
    };
    write_stdout(&output)
}

/// Runs the `watch` subcommand. Prints one JSON line per poll.
#[instrument(skip_all, fields(function = %args.request.function))]
async fn run_watch(args: &WatchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let endpoint = lookup_endpoint(&args.request.function)?;
    let Some(interval) = endpoint.cache.preset().refetch_interval else {
        bail!(
            "{} uses the {} cache strategy, which is never refetched",
            endpoint.function_name,
            endpoint.cache
        );
    };
    let params = build_params(endpoint, &args.request)?;
    let client = build_client(dir, args.request.strategy, !args.request.no_validate)?;

    tracing::info!(
        "Watching {} every {}s",
        endpoint.function_name,
        interval.as_secs()
    );
    let mut polls: u32 = 0;
    loop {
        match client.fetch(endpoint, &params).await {
            Ok(value) => {
                let line = serde_json::to_string(&value).context("failed to serialize response")?;
                write_stdout(&line)?;
            }
            Err(e) => tracing::warn!("Poll failed: {:#}", anyhow::Error::from(e)),
        }
        polls = polls.saturating_add(1);
        if args.count.is_some_and(|max| polls >= max) {
            return Ok(());
        }
        tokio::time::sleep(interval).await;
    }
}

/// Runs the `normalize` subcommand.
fn run_normalize(args: &NormalizeArgs) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mut value = normalize(&text)
        .with_context(|| format!("failed to normalize {}", args.file.display()))?;
    if let Some(function) = args.endpoint.as_deref() {
        let endpoint = lookup_endpoint(function)?;
        value = endpoint.output.conform(value).with_context(|| {
            format!(
                "{} does not match the {function} output schema",
                args.file.display()
            )
        })?;
    }
    write_stdout(&serde_json::to_string_pretty(&value).context("failed to serialize result")?)
}

/// Runs the `openapi` subcommand.
fn run_openapi(args: &OpenapiArgs) -> Result<()> {
    let document = wsdot_api::openapi::document(args.api);
    let yaml = wsdot_api::openapi::to_yaml(&document).context("failed to render OpenAPI YAML")?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, yaml)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(
                "Wrote {} paths for {} to {}",
                document.paths.len(),
                args.api,
                path.display()
            );
            Ok(())
        }
        None => write_stdout(yaml.trim_end()),
    }
}

/// Runs the `config set-key` subcommand.
fn run_config_set_key(args: &SetKeyArgs, dir: Option<&PathBuf>) -> Result<()> {
    let key = args.key.trim();
    if key.is_empty() {
        bail!("access code must not be empty");
    }
    let config_path = resolve_config_path(dir)?;
    let mut config = AppConfig::load(&config_path)?;
    config.api.access_code = Some(String::from(key));
    config.save(&config_path)?;
    tracing::info!("Saved access code to {}", config_path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir)?;
    let config = AppConfig::load(&config_path)?;

    let access_code = match config.access_code() {
        Some(code) if config.api.access_code.as_deref() == Some(code.as_str()) => {
            format!("{} (config file)", mask_secret(&code))
        }
        Some(code) => format!("{} ({ACCESS_CODE_ENV})", mask_secret(&code)),
        None => String::from("(not set)"),
    };
    let mut lines = vec![
        format!("config_path: {}", config_path.display()),
        format!("access_code: {access_code}"),
    ];
    for family in ApiFamily::ALL {
        let url = config
            .base_url(family)?
            .map_or_else(|| String::from(family.default_base_url()), String::from);
        lines.push(format!("{family}_base_url: {url}"));
    }
    let strategy = config.api.strategy.unwrap_or_else(Strategy::detect);
    lines.push(format!("strategy: {strategy}"));
    write_stdout(&lines.join("\n"))
}

/// OpenTelemetry providers installed when `OTEL_EXPORTER_OTLP_ENDPOINT` is set.
#[cfg(feature = "otel")]
struct Telemetry {
    /// Span export.
    tracer_provider: opentelemetry_sdk::trace::SdkTracerProvider,
    /// Log export via the tracing bridge.
    logger_provider: opentelemetry_sdk::logs::SdkLoggerProvider,
    /// Request counters from `wsdot-api`.
    meter_provider: opentelemetry_sdk::metrics::SdkMeterProvider,
}

#[cfg(feature = "otel")]
impl Telemetry {
    /// Builds OTLP/HTTP exporters from the standard `OTEL_*` variables.
    fn from_env() -> Option<Self> {
        std::env::var_os("OTEL_EXPORTER_OTLP_ENDPOINT")?;

        let span_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_http()
            .build()
            .ok()?;
        let log_exporter = opentelemetry_otlp::LogExporter::builder()
            .with_http()
            .build()
            .ok()?;
        let metric_exporter = opentelemetry_otlp::MetricExporter::builder()
            .with_http()
            .build()
            .ok()?;

        let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
            .with_batch_exporter(span_exporter)
            .build();
        let logger_provider = opentelemetry_sdk::logs::SdkLoggerProvider::builder()
            .with_batch_exporter(log_exporter)
            .build();
        let meter_provider = opentelemetry_sdk::metrics::SdkMeterProvider::builder()
            .with_periodic_exporter(metric_exporter)
            .build();

        opentelemetry::global::set_tracer_provider(tracer_provider.clone());
        opentelemetry::global::set_meter_provider(meter_provider.clone());

        Some(Self {
            tracer_provider,
            logger_provider,
            meter_provider,
        })
    }

    /// Flushes and stops every provider.
    fn shutdown(self) {
        if let Err(e) = self.meter_provider.shutdown() {
            tracing::warn!("Failed to flush metrics: {e}");
        }
        if let Err(e) = self.tracer_provider.shutdown() {
            tracing::warn!("Failed to flush spans: {e}");
        }
        if let Err(e) = self.logger_provider.shutdown() {
            tracing::warn!("Failed to flush logs: {e}");
        }
    }
}

/// Keeps exporter and HTTP client internals out of exported logs.
#[cfg(feature = "otel")]
fn is_exported_target(metadata: &tracing::Metadata<'_>) -> bool {
    const SKIPPED: [&str; 4] = ["opentelemetry", "hyper", "reqwest", "h2"];
    !SKIPPED
        .iter()
        .any(|prefix| metadata.target().starts_with(prefix))
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    #[cfg(feature = "otel")]
    let telemetry = {
        use tracing_subscriber::Layer as _;

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);

        let telemetry = Telemetry::from_env();
        let trace_layer = telemetry.as_ref().map(|t| {
            let tracer = opentelemetry::trace::TracerProvider::tracer(
                &t.tracer_provider,
                env!("CARGO_PKG_NAME"),
            );
            tracing_opentelemetry::layer().with_tracer(tracer)
        });
        let log_layer = telemetry.as_ref().map(|t| {
            opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge::new(
                &t.logger_provider,
            )
            .with_filter(tracing_subscriber::filter::filter_fn(is_exported_target))
        });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(trace_layer)
            .with(log_layer)
            .init();
        telemetry
    };

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    let result = match cli.command {
        Commands::Endpoints(args) => run_endpoints(&args),
        Commands::Fetch(args) => run_fetch(&args, dir).await,
        Commands::Watch(args) => run_watch(&args, dir).await,
        Commands::Normalize(args) => run_normalize(&args),
        Commands::Openapi(args) => run_openapi(&args),
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::SetKey(args) => run_config_set_key(&args, dir),
            ConfigSubcommands::Show => run_config_show(dir),
        },
    };

    #[cfg(feature = "otel")]
    {
        if let Some(telemetry) = telemetry {
            telemetry.shutdown();
        }
    }

    result
}

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use specbridge::config::Config;
use specbridge::envelope::ResultEnvelope;
use specbridge::fetch::{fetch_document, DocumentSource};
use specbridge::generator::{generate_tool_schemas_with_options, GeneratorOptions};
use specbridge::parser::parse_document_value;
use specbridge::scaffold::{generate_scaffold, ScaffoldTarget};
use specbridge::server;
use specbridge::DEFAULT_CONFIG_FILE;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Server host
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(long)]
    port: Option<u16>,

    /// One-shot mode: path or URL of an OpenAPI document to convert,
    /// printing tool schemas instead of starting the server
    #[arg(long)]
    spec: Option<String>,

    /// One-shot mode: write the tool-schema JSON here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// One-shot mode: also emit a project scaffold (typescript or python)
    #[arg(long)]
    scaffold: Option<String>,

    /// Directory for emitted scaffold files
    #[arg(long, default_value = "scaffold-out")]
    out_dir: PathBuf,

    /// Project name used in scaffold manifests
    #[arg(long)]
    project_name: Option<String>,

    /// Prefix applied to every generated tool name
    #[arg(long)]
    tool_prefix: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli.log_level);

    let config = Config::load(Some(cli.config.as_path()), cli.host.clone(), cli.port).map_err(|e| {
        error!("Failed to load configuration: {}", e);
        anyhow::anyhow!(e.to_string())
    })?;

    if cli.spec.is_some() {
        run_one_shot(&cli, &config).await
    } else {
        info!("Specbridge v{} starting in server mode", env!("CARGO_PKG_VERSION"));
        server::start_server(config).await.context("HTTP server failed")
    }
}

/// Convert one document and exit
async fn run_one_shot(cli: &Cli, config: &Config) -> Result<()> {
    let spec = cli.spec.as_deref().expect("one-shot mode requires --spec");

    let source = if spec.starts_with("http://") || spec.starts_with("https://") {
        DocumentSource::Url(spec.to_string())
    } else {
        let text = std::fs::read_to_string(spec)
            .with_context(|| format!("failed to read spec file {}", spec))?;
        DocumentSource::Inline(text)
    };

    let timeout = Duration::from_secs(config.fetch.timeout_secs);
    let (doc, source_tag) = fetch_document(&source, timeout)
        .await
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let parsed = parse_document_value(&doc).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let mut options = GeneratorOptions::default();
    if let Some(prefix) = &cli.tool_prefix {
        options = options.with_tool_prefix(prefix.clone());
    }
    let generation = generate_tool_schemas_with_options(&parsed, &options)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

    info!(
        "Generated {} tool schemas from {}",
        generation.summary.total_tools,
        source_tag.as_deref().unwrap_or(spec)
    );

    let mut envelope = ResultEnvelope::new(&generation);
    if let Some(tag) = source_tag {
        envelope = envelope.with_source(tag);
    }
    let rendered = serde_json::to_string_pretty(&envelope)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote tool schemas to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if let Some(language) = &cli.scaffold {
        let target = ScaffoldTarget::from_str(language)
            .ok_or_else(|| anyhow::anyhow!("unsupported scaffold language: {}", language))?;
        let files = generate_scaffold(
            &parsed,
            &generation.tools,
            target,
            cli.project_name.as_deref(),
        )
        .map_err(|e| anyhow::anyhow!(e.to_string()))?;

        for file in &files {
            let path = cli.out_dir.join(&file.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &file.content)?;
        }
        info!("Wrote {} scaffold files to {}", files.len(), cli.out_dir.display());
    }

    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(env_filter)
        .init();
}

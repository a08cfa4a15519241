//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use scribe_core::{Operator, Orchestrator, Profile, RunSettings, RunSummary, collect_brief};
use scribe_export::{ExportSettings, Exporter};
use scribe_generation::{GeminiClient, GeminiSettings, GenerationClient, RetryPolicy};
use scribe_search::{GoogleSearchClient, SearchSettings};
use scribe_shared::{AppConfig, Credentials, ScribeError, init_config, load_config, load_dotenv};
use tracing::info;

use crate::console::{CliProgress, ConsoleOperator, spinner};

/// Exit status used when the session is interrupted.
const INTERRUPTED_EXIT_CODE: i32 = 130;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Scribe: research-backed, interactive document generation.
#[derive(Parser)]
#[command(
    name = "scribe",
    version,
    about = "Generate website copy or long-form manuals section by section with an LLM.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Start an interactive writing session.
    Write {
        /// Writing profile: website-copy or manual.
        #[arg(short, long, default_value = "website-copy")]
        profile: Profile,

        /// Directory for checkpoints and final documents (overrides config).
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Generation model (overrides config), e.g. gemini-2.5-pro.
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List the generation models available to the configured key.
    Models,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so they do not
/// interleave with prompts on stdout.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "scribe=info",
        1 => "scribe=debug",
        _ => "scribe=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Write {
            profile,
            output_dir,
            model,
        } => cmd_write(profile, output_dir, model).await,
        Command::Models => cmd_models().await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

/// Config file plus command-line overrides.
fn resolve_config(output_dir: Option<PathBuf>, model: Option<String>) -> Result<AppConfig> {
    let mut config = load_config()?;
    if let Some(dir) = output_dir {
        config.writing.output_dir = dir.to_string_lossy().into_owned();
    }
    if let Some(model) = model {
        config.generation.model = model;
    }
    Ok(config)
}

async fn cmd_write(profile: Profile, output_dir: Option<PathBuf>, model: Option<String>) -> Result<()> {
    // Credentials are checked before anything is asked.
    load_dotenv();
    let config = resolve_config(output_dir, model)?;
    let credentials = Credentials::from_env(&config)?;

    let generator = GeminiClient::new(GeminiSettings::new(&config.generation, &credentials))?;
    let client = GenerationClient::new(generator, RetryPolicy::from(&config.generation));
    let lookup = GoogleSearchClient::new(SearchSettings::new(&config.search, &credentials)?)?;
    let exporter = Exporter::new(ExportSettings::from(&config.writing));
    let settings = RunSettings::new(&config, profile);

    info!(
        %profile,
        model = %config.generation.model,
        output_dir = %config.writing.output_dir,
        "starting writing session"
    );

    let spinner = spinner();
    let progress = CliProgress::new(spinner.clone());
    let mut operator = ConsoleOperator::new(spinner.clone());

    operator.notice(&format!("--- Scribe v{} ({profile}) ---\n", env!("CARGO_PKG_VERSION")));

    let session = tokio::spawn(async move {
        write_session(profile, &mut operator, &progress, client, lookup, exporter, settings).await
    });

    tokio::select! {
        joined = session => {
            spinner.finish_and_clear();
            let outcome = joined.map_err(|e| eyre!("writing session failed: {e}"))??;
            if let Some(summary) = outcome {
                print_summary(&summary);
            }
            Ok(())
        }
        _ = tokio::signal::ctrl_c() => {
            spinner.finish_and_clear();
            println!("\n\nStopped by user. The last checkpoint on disk is intact.");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}

/// Brief collection followed by the full run. `None` when the operator
/// declines to enter a subject.
async fn write_session(
    profile: Profile,
    operator: &mut ConsoleOperator,
    progress: &CliProgress,
    client: GenerationClient<GeminiClient>,
    lookup: GoogleSearchClient,
    exporter: Exporter,
    settings: RunSettings,
) -> std::result::Result<Option<RunSummary>, ScribeError> {
    let Some(brief) = collect_brief(profile, operator).await? else {
        return Ok(None);
    };
    operator.notice(&format!("\nStarting: {}", brief.subject));

    let mut orchestrator = Orchestrator::new(profile, brief, client, lookup, exporter, settings);
    let summary = orchestrator.run(operator, progress).await?;
    Ok(Some(summary))
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("  Document complete!");
    println!("  Run:        {}", summary.run_id);
    println!("  Parts:      {}", summary.parts);
    println!("  Sections:   {}", summary.sections);
    if summary.degraded_sections > 0 {
        println!("  With errors: {}", summary.degraded_sections);
    }
    println!("  References: {}", summary.references);
    match &summary.final_document {
        Some(doc) => {
            println!("  Markdown:   {}", doc.markdown_path.display());
            if let Some(rich) = &doc.rich_path {
                println!("  Rich:       {}", rich.display());
            }
            println!("  SHA-256:    {}", doc.sha256);
        }
        None => println!("  Final document could not be saved; see the log above."),
    }
    println!("  Time:       {:.1}s", summary.elapsed.as_secs_f64());
    println!();
}

async fn cmd_models() -> Result<()> {
    load_dotenv();
    let config = load_config()?;

    let key_var = &config.generation.api_key_env;
    let api_key = std::env::var(key_var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| eyre!("{key_var} is not set"))?;

    let settings = GeminiSettings {
        base_url: config.generation.base_url.trim_end_matches('/').to_string(),
        model: config.generation.model.clone(),
        api_key,
    };
    let client = GeminiClient::new(settings)?;
    let models = client.list_models().await?;

    println!("Models supporting content generation:");
    for model in &models {
        match &model.display_name {
            Some(display) => println!("  {:<40} {display}", model.name),
            None => println!("  {}", model.name),
        }
    }
    if models.is_empty() {
        println!("  (none)");
    }

    Ok(())
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

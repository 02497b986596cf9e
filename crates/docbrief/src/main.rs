use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docbrief_common::{logger, AppConfig};
use docbrief_llm::{
    build_gateway, ContextProfile, Degradation, RefineRequest, RoleProfile, SourceDocument,
    StructuredSummary, Summarizer, SummarizerSettings,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "docbrief")]
#[command(about = "DocBrief - context-aware document summarization", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long)]
        port: Option<u16>,
    },

    /// Summarize one or more plain-text files as a single document
    Summarize {
        /// Text files to summarize
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Audience: executive, student, analyst or general
        #[arg(long, default_value = "general")]
        context: String,

        /// Reader role: student, researcher or professional
        #[arg(long)]
        role: Option<String>,

        /// Add keywords, detected sections and an extractive selection
        #[arg(long)]
        hybrid: bool,

        /// Print JSON instead of sections
        #[arg(long)]
        json: bool,
    },

    /// Shorten, refine or regenerate a saved summary
    Refine {
        /// JSON file holding a summary (or the output of `summarize --json`)
        summary: PathBuf,

        /// shorten, refine or regenerate
        #[arg(long)]
        action: String,

        /// Audience used when regenerating
        #[arg(long, default_value = "general")]
        context: String,

        /// Reader role used when regenerating
        #[arg(long)]
        role: Option<String>,

        /// Original document, used by regenerate instead of the summary text
        #[arg(long)]
        source: Option<PathBuf>,

        /// Print JSON instead of sections
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env at project root
    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve { host, port }) => {
            // Override with CLI arguments
            if let Some(host) = &host {
                std::env::set_var("SERVER_HOST", host);
            }
            if let Some(port) = port {
                std::env::set_var("SERVER_PORT", port.to_string());
            }
            serve().await?;
        }
        Some(Commands::Summarize {
            files,
            context,
            role,
            hybrid,
            json,
        }) => {
            let summarizer = cli_summarizer()?;
            let context: ContextProfile = context.parse()?;
            let role = role.map(|r| r.parse::<RoleProfile>()).transpose()?;

            let documents = files
                .iter()
                .map(|path| read_document(path))
                .collect::<Result<Vec<_>>>()?;

            if hybrid {
                let text = docbrief_llm::combine_documents(&documents);
                let hybrid = summarizer.summarize_hybrid(&text, context, role).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&hybrid)?);
                } else {
                    print_summary(&hybrid.outcome.summary);
                    println!("[KEYWORDS]\n{}\n", hybrid.keywords.join(", "));
                    for (section, text) in &hybrid.sections {
                        println!("[DETECTED {}]\n{}\n", section.as_str().to_uppercase(), text);
                    }
                    if !hybrid.extractive.is_empty() {
                        println!("[EXTRACT]\n{}\n", hybrid.extractive);
                    }
                    report_degradations(&hybrid.outcome.degradations);
                }
            } else {
                let outcome = summarizer.summarize_documents(&documents, context, role).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                } else {
                    print_summary(&outcome.summary);
                    report_degradations(&outcome.degradations);
                }
            }
        }
        Some(Commands::Refine {
            summary,
            action,
            context,
            role,
            source,
            json,
        }) => {
            let summarizer = cli_summarizer()?;
            let (existing, revision) = read_summary(&summary)?;
            let source_text = source
                .as_deref()
                .map(|path| {
                    std::fs::read_to_string(path)
                        .with_context(|| format!("Failed to read {}", path.display()))
                })
                .transpose()?;

            let request = RefineRequest {
                existing: &existing,
                action: &action,
                context: context.parse()?,
                role: role.map(|r| r.parse::<RoleProfile>()).transpose()?,
                revision,
                source_text: source_text.as_deref(),
            };
            let refinement = summarizer.refine(request).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&refinement)?);
            } else {
                print_summary(&refinement.summary);
                report_degradations(&refinement.degradations);
            }
        }
        None => {
            serve().await?;
        }
    }

    Ok(())
}

/// Run the HTTP server with file and console logging
async fn serve() -> Result<()> {
    let config = AppConfig::from_env()?;
    logger::setup_logging(&config.log_dir, &config.log_level)?;

    tracing::info!("DocBrief starting...");
    tracing::info!("Configuration loaded:");
    tracing::info!("  Backend: {}", config.llm_backend.as_str());
    tracing::info!("  Chunk size: {} chars", config.chunk_max_chars);

    println!("Server listening on http://{}", config.server_bind_address());
    docbrief_server::start_server(config).await?;
    Ok(())
}

/// Summarizer for one-shot commands; logs go to stderr only
fn cli_summarizer() -> Result<Summarizer> {
    let config = AppConfig::from_env()?;
    logger::setup_console_logging(&config.log_level)?;

    let gateway = build_gateway(&config)?;
    Ok(Summarizer::new(gateway, SummarizerSettings::from(&config)))
}

fn read_document(path: &Path) -> Result<SourceDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(SourceDocument::new(name, text))
}

/// Load a summary and its revision from JSON.
///
/// Accepts a bare summary, `summarize --json` output (`summary`), or an API
/// response (`content`).
fn read_summary(path: &Path) -> Result<(StructuredSummary, u64)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;

    let revision = value
        .get("revision")
        .or_else(|| value.pointer("/metadata/revision"))
        .and_then(Value::as_u64)
        .unwrap_or(1);

    let summary = match value.get("content").or_else(|| value.get("summary")) {
        Some(inner) => inner.clone(),
        None => value,
    };
    if !summary.is_object() {
        bail!("{} does not contain a summary object", path.display());
    }

    Ok((serde_json::from_value(summary)?, revision))
}

fn print_summary(summary: &StructuredSummary) {
    let fields = [
        ("OVERVIEW", &summary.overview),
        ("KEY INSIGHTS", &summary.key_insights),
        ("RISKS", &summary.risks),
        ("RECOMMENDATIONS", &summary.recommendations),
    ];
    for (header, text) in fields {
        if !text.trim().is_empty() {
            println!("[{}]\n{}\n", header, text);
        }
    }
}

fn report_degradations(degradations: &[Degradation]) {
    if !degradations.is_empty() {
        eprintln!("note: result is degraded ({:?})", degradations);
    }
}

//! sentiq - generation gateway CLI
//!
//! One-shot generation and cache-key inspection against the configured
//! providers.

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use sentiq::{CallContext, Config, Generation, GatewayBuilder, GenerationRequest, ProviderId};

/// Sentiq CLI
#[derive(Parser)]
#[command(name = "sentiq")]
#[command(version = sentiq::PKG_VERSION)]
#[command(about = "Generation request gateway")]
struct Args {
    /// Config file (default: ~/.sentiq/config.toml, then /etc/sentiq/config.toml)
    #[arg(short, long, env = "SENTIQ_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate text for a prompt
    Generate {
        /// Prompt text (or omit to read from stdin)
        prompt: Option<String>,
        /// Task tag (e.g. resume_generation, general)
        #[arg(short, long, default_value = "general")]
        task: String,
        /// Provider to try first: primary/gemini or secondary/groq
        #[arg(short, long)]
        prefer: Option<String>,
        /// Model override for every provider
        #[arg(short, long)]
        model: Option<String>,
        /// Return a synthetic payload without calling providers
        #[arg(long)]
        simulate: bool,
        /// Per-call timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Print the cache key for a request
    Key {
        /// Prompt text (or omit to read from stdin)
        prompt: Option<String>,
        /// Task tag
        #[arg(short, long, default_value = "general")]
        task: String,
        /// Provider preference (affects the resolved model)
        #[arg(short, long)]
        prefer: Option<String>,
        /// Model override
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    config.apply_env()?;
    let gateway = GatewayBuilder::from_config(&config).build()?;

    match args.command {
        Command::Generate {
            prompt,
            task,
            prefer,
            model,
            simulate,
            timeout,
        } => {
            let prompt = resolve_text(prompt, "generate")?;
            let request = build_request(prompt, task, prefer, model).simulate(simulate);
            let mut ctx = CallContext::new();
            if let Some(secs) = timeout {
                ctx = ctx.timeout(Duration::from_secs(secs));
            }

            match gateway.generate(&request, &ctx).await {
                Generation::Text { text, .. } => println!("{text}"),
                Generation::Failed(failure) => {
                    eprintln!("all providers failed:");
                    for attempt in &failure.attempts {
                        eprintln!(
                            "  {} ({}): [{}] {}",
                            attempt.name, attempt.provider, attempt.kind, attempt.error
                        );
                    }
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Command::Key {
            prompt,
            task,
            prefer,
            model,
        } => {
            let prompt = resolve_text(prompt, "key")?;
            let request = build_request(prompt, task, prefer, model);
            println!("{}", gateway.cache_key(&request));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn build_request(
    prompt: String,
    task: String,
    prefer: Option<String>,
    model: Option<String>,
) -> GenerationRequest {
    let mut request = GenerationRequest::new(prompt, task);
    if let Some(preferred) = prefer.as_deref().and_then(ProviderId::parse_preference) {
        request = request.prefer(preferred);
    }
    if let Some(model) = model {
        request = request.model(model);
    }
    request
}

/// Resolve text input from an optional CLI argument and/or stdin.
///
/// - arg only → arg
/// - stdin only → stdin
/// - both → `"{arg}\n\n{stdin}"`
/// - neither → error
fn resolve_text(arg: Option<String>, command: &str) -> Result<String, Box<dyn std::error::Error>> {
    let stdin_text = if io::stdin().is_terminal() {
        None
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    match (arg, stdin_text) {
        (Some(a), Some(s)) => Ok(format!("{a}\n\n{s}")),
        (Some(a), None) => Ok(a),
        (None, Some(s)) => Ok(s),
        (None, None) => {
            Err(format!("{command}: no input provided (pass text as argument or via stdin)").into())
        }
    }
}

//! CLI binary for flexbox-convert.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and writes the result.

use anyhow::{bail, Context, Result};
use clap::Parser;
use flexbox_convert::{
    convert, convert_to_file, inspect, render_output, ConversionConfig, ConversionObserver,
    ConversionStats, ExamplePairPaths, OutputMode,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Spinner while the request is in flight; prints the raw reply when asked.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new(show_spinner: bool) -> Arc<Self> {
        let bar = if show_spinner {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            bar.set_prefix("Preparing");
            bar.set_message("Loading examples…");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        } else {
            ProgressBar::hidden()
        };
        Arc::new(Self { bar })
    }

    /// Without the spinner, logging runs at INFO and already prints the reply.
    fn echoes_raw_response(&self) -> bool {
        !self.bar.is_hidden()
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ConversionObserver for CliObserver {
    fn on_inputs_loaded(&self, example_pairs: usize) {
        self.bar
            .set_message(format!("Loaded {example_pairs} example pairs"));
    }

    fn on_request_start(&self, transport: &str, messages: usize) {
        self.bar.set_prefix("Converting");
        self.bar
            .set_message(format!("waiting for {transport} ({messages} messages)…"));
    }

    fn on_raw_response(&self, raw: &str) {
        if !self.echoes_raw_response() {
            return;
        }
        self.bar
            .println(format!("{} {}", cyan("◆"), bold("Raw response from model:")));
        self.bar.println(raw);
    }

    fn on_conversion_complete(&self, _stats: &ConversionStats) {
        self.finish();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Classic run: container-v3-{1,2,3}.json / container-v4-{1,2,3}.json and
  # container-user.json in the current directory → converted-real-widget-wrapped.json
  flexbox-convert

  # Show the model's raw reply before it is parsed
  flexbox-convert --log-raw-response

  # Unwrapped widget → converted-real-widget.json
  flexbox-convert --no-envelope

  # Fixtures elsewhere, two pairs, custom output
  flexbox-convert --examples-dir fixtures --pairs 2 -i fixtures/hero.json -o out/hero-v4.json

  # Explicit pairs instead of numbered files
  flexbox-convert --pair a-v3.json,a-v4.json --pair b-v3.json,b-v4.json -i target.json

  # Print the transcript without calling the API (no key needed)
  flexbox-convert --dry-run

  # Another provider through edgequake-llm
  flexbox-convert --provider ollama --model llama3.1

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY        API key for the OpenAI-compatible endpoint
  OPENAI_BASE_URL       Override the endpoint (Azure proxy, vLLM, LiteLLM, …)
  ANTHROPIC_API_KEY     Used with --provider anthropic
  GEMINI_API_KEY        Used with --provider gemini
  RUST_LOG              Overrides the log filter
"#;

/// Convert Elementor V3 container widgets to V4 flexbox widgets with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "flexbox-convert",
    version,
    about = "Convert Elementor V3 container widgets to V4 flexbox widgets with an LLM",
    long_about = "Send a few example V3 → V4 widget conversions plus your V3 widget to a \
chat-completion model and save the V4 widget it returns. Works with OpenAI, any \
OpenAI-compatible endpoint, and the providers supported by edgequake-llm.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory holding container-v3-N.json / container-v4-N.json.
    #[arg(long, env = "FLEXBOX_EXAMPLES_DIR", default_value = ".")]
    examples_dir: PathBuf,

    /// Number of numbered example pairs to send.
    #[arg(long, env = "FLEXBOX_PAIRS", default_value_t = 3)]
    pairs: usize,

    /// Explicit example pair "INPUT,OUTPUT" (repeatable; replaces numbered pairs).
    #[arg(long = "pair", value_name = "INPUT,OUTPUT")]
    pair: Vec<String>,

    /// V3 widget to convert. Default: <examples-dir>/container-user.json.
    #[arg(short, long, env = "FLEXBOX_INPUT")]
    input: Option<PathBuf>,

    /// Output file. Default: converted-real-widget-wrapped.json
    /// (or converted-real-widget.json with --no-envelope).
    #[arg(short, long, env = "FLEXBOX_OUTPUT")]
    output: Option<PathBuf>,

    /// Write the bare widget instead of the page envelope.
    #[arg(long, env = "FLEXBOX_NO_ENVELOPE")]
    no_envelope: bool,

    /// Print the JSON to stdout instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    /// Print the transcript as JSON and exit without calling the API.
    #[arg(long)]
    dry_run: bool,

    /// Chat model ID.
    #[arg(long, env = "FLEXBOX_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// edgequake-llm provider: anthropic, gemini, ollama, azure, openai.
    #[arg(long, env = "FLEXBOX_PROVIDER")]
    provider: Option<String>,

    /// API key for the OpenAI-compatible endpoint.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint.
    #[arg(long, env = "OPENAI_BASE_URL")]
    api_base: Option<String>,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "FLEXBOX_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "FLEXBOX_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Max output tokens.
    #[arg(long, env = "FLEXBOX_MAX_TOKENS", default_value_t = 2000)]
    max_tokens: usize,

    /// Print the model's raw reply before parsing it.
    #[arg(long, env = "FLEXBOX_LOG_RAW_RESPONSE")]
    log_raw_response: bool,

    /// Do not unwrap a ```json fence around the reply.
    #[arg(long)]
    keep_fences: bool,

    /// Treat a {"error": "..."} reply as a converted widget.
    #[arg(long, env = "FLEXBOX_ACCEPT_ERROR_PAYLOAD")]
    accept_error_payload: bool,

    /// Disable the spinner.
    #[arg(long, env = "FLEXBOX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FLEXBOX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "FLEXBOX_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner carries the feedback; keep INFO logs out of its way.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.dry_run;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mode = if cli.no_envelope {
        OutputMode::Document
    } else {
        OutputMode::Enveloped
    };

    // ── Dry run ──────────────────────────────────────────────────────────
    if cli.dry_run {
        let config = build_config(&cli, None).await?;
        let transcript = inspect(&config).await.context("Failed to load inputs")?;
        println!(
            "{}",
            serde_json::to_string_pretty(&transcript).context("Failed to serialise transcript")?
        );
        return Ok(());
    }

    let observer = CliObserver::new(show_progress);
    let config = build_config(
        &cli,
        Some(Arc::clone(&observer) as Arc<dyn ConversionObserver>),
    )
    .await?;

    // ── Run conversion ───────────────────────────────────────────────────
    if cli.stdout {
        let result = convert(&config).await;
        observer.finish();
        let output = result.context("Conversion failed")?;
        println!("{}", render_output(output.document, mode)?);
        if !cli.quiet {
            print_summary(&output.stats, None);
        }
    } else {
        let output_path = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(mode.default_file_name()));
        let result = convert_to_file(&config, &output_path, mode).await;
        observer.finish();
        let stats = result.context("Conversion failed")?;
        if !cli.quiet {
            print_summary(&stats, Some(&output_path));
        }
    }

    Ok(())
}

fn print_summary(stats: &ConversionStats, output_path: Option<&Path>) {
    match output_path {
        Some(path) => eprintln!(
            "{}  {}  {}ms  →  {}",
            green("✔"),
            stats.model,
            stats.total_duration_ms,
            bold(&path.display().to_string()),
        ),
        None => eprintln!(
            "{}  {}  {}ms",
            green("✔"),
            stats.model,
            stats.total_duration_ms
        ),
    }
    eprintln!(
        "   {} tokens in  /  {} tokens out",
        dim(&stats.input_tokens.to_string()),
        dim(&stats.output_tokens.to_string()),
    );
}

/// Map CLI args to `ConversionConfig`.
async fn build_config(
    cli: &Cli,
    observer: Option<Arc<dyn ConversionObserver>>,
) -> Result<ConversionConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let examples = if cli.pair.is_empty() {
        ExamplePairPaths::numbered(&cli.examples_dir, cli.pairs)
    } else {
        cli.pair
            .iter()
            .map(|p| parse_pair(p))
            .collect::<Result<Vec<_>>>()?
    };

    let input = cli
        .input
        .clone()
        .unwrap_or_else(|| cli.examples_dir.join(flexbox_convert::config::DEFAULT_INPUT_FILE));

    let mut builder = ConversionConfig::builder()
        .examples(examples)
        .input_path(input)
        .model(cli.model.clone())
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .log_raw_response(cli.log_raw_response)
        .strip_code_fences(!cli.keep_fences)
        .accept_error_payload(cli.accept_error_payload);

    if let Some(ref prompt) = system_prompt {
        builder = builder.system_prompt(prompt.clone());
    }
    if let Some(ref name) = cli.provider {
        builder = builder.provider_name(name.clone());
    }
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key.clone());
    }
    if let Some(ref base) = cli.api_base {
        builder = builder.api_base(base.clone());
    }
    if let Some(obs) = observer {
        builder = builder.observer(obs);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pair INPUT,OUTPUT`.
fn parse_pair(s: &str) -> Result<ExamplePairPaths> {
    let Some((input, output)) = s.split_once(',') else {
        bail!("Invalid --pair '{}': expected INPUT,OUTPUT", s);
    };
    let (input, output) = (input.trim(), output.trim());
    if input.is_empty() || output.is_empty() {
        bail!("Invalid --pair '{}': both paths are required", s);
    }
    Ok(ExamplePairPaths::new(input, output))
}

//! audiobook - Convert plain-text documents to audiobooks with a text-to-speech API

mod config;
mod cost;
mod playlist;
mod synth;
mod text;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::AudiobookConfig;
use cost::Estimate;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use synth::{AudiobookCreator, RunError, RunSummary};
use tts_client::{Model, ProviderConfig, SpeechProvider, Voice};

const DEFAULT_TITLE: &str = "My Audiobook";

#[derive(Parser, Debug)]
#[command(name = "audiobook")]
#[command(about = "Convert plain-text documents to audiobooks using text-to-speech", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the UTF-8 text file ("-" reads stdin)
    input: Option<PathBuf>,

    /// Output directory (default from config: audiobook_output)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Book title, used for the playlist (default: input file name)
    #[arg(short, long)]
    title: Option<String>,

    /// Voice: alloy, echo, fable, onyx, nova, shimmer
    #[arg(long)]
    voice: Option<Voice>,

    /// Model: tts-1 (standard) or tts-1-hd (high definition)
    #[arg(long)]
    model: Option<Model>,

    /// Maximum characters per request
    #[arg(long)]
    max_chars: Option<usize>,

    /// Pause between requests in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Speech provider (openai, openai-compatible)
    #[arg(long)]
    provider: Option<String>,

    /// Print the cost estimate and exit without calling the API
    #[arg(long)]
    estimate: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Clean a text file for conversion (collapse blank lines and spaces)
    Prepare {
        /// Source text file
        input: PathBuf,
        /// Where to write the cleaned text
        output: PathBuf,
    },
    /// Estimate cost and time for converting a text file
    Estimate {
        /// Text file ("-" reads stdin)
        input: PathBuf,
        /// Model tier to price
        #[arg(long)]
        model: Option<Model>,
    },
    /// List available voices
    Voices,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Set default voice
    SetVoice { voice: Voice },
    /// Set default model (tts-1 or tts-1-hd)
    SetModel { model: Model },
    /// Set maximum characters per request
    SetMaxChars { value: usize },
    /// Set pause between requests in milliseconds
    SetDelay { ms: u64 },
    /// Set default output directory
    SetOutputDir { path: PathBuf },
    /// Set default speech provider
    SetProvider { name: String },
    /// Store an API key for a speech provider in tts.toml
    SetApiKey {
        key: String,
        /// Provider to configure (default: the tts-client default provider)
        #[arg(long)]
        provider: Option<String>,
    },
    /// Store a custom base URL for a speech provider in tts.toml
    SetBaseUrl {
        url: String,
        /// Provider to configure (default: the tts-client default provider)
        #[arg(long)]
        provider: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    match &args.command {
        Some(Commands::Config { action }) => return handle_config_command(action),
        Some(Commands::Prepare { input, output }) => return prepare_file(input, output),
        Some(Commands::Estimate { input, model }) => {
            let config = AudiobookConfig::load().context("Failed to load configuration")?;
            let text = read_input(input)?;
            let model = model.unwrap_or(config.model);
            return print_estimate(&text, model, config.max_chars);
        }
        Some(Commands::Voices) => return list_voices(),
        None => {}
    }

    let input = args
        .input
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Input file is required. Run 'audiobook --help' for usage."))?;

    let config = AudiobookConfig::load().context("Failed to load configuration")?;

    let mut options = config.synth_options();
    if let Some(voice) = args.voice {
        options = options.with_voice(voice);
    }
    if let Some(model) = args.model {
        options = options.with_model(model);
    }
    if let Some(max_chars) = args.max_chars {
        options = options.with_max_chars(max_chars);
    }
    if let Some(ms) = args.delay_ms {
        options = options.with_request_delay(Duration::from_millis(ms));
    }

    let output_dir = args.output_dir.clone().unwrap_or(config.output_dir.clone());
    let title = args.title.clone().unwrap_or_else(|| default_title(&input));
    let from_stdin = input.as_os_str() == "-";

    if !from_stdin && !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    if args.estimate {
        let text = read_input(&input)?;
        return print_estimate(&text, options.model, options.max_chars);
    }

    let provider = create_provider(args.provider.as_deref().or(config.provider.as_deref()))?;
    let creator = AudiobookCreator::new(provider, options);

    log::debug!("Input: {}", input.display());
    log::debug!("Output dir: {}", output_dir.display());
    log::debug!("Title: {}", title);
    log::debug!("Options: {:?}", creator.options());
    log::info!("Using {} provider", creator.provider().name());

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let on_progress = |progress: &synth::RunProgress| {
        pb.set_length(progress.total as u64);
        pb.set_position(progress.completed as u64);
        if let Some(name) = progress.file.file_name() {
            pb.set_message(name.to_string_lossy().into_owned());
        }
    };

    let result = if from_stdin {
        let text = match read_stdin(std::io::stdin(), &input) {
            Ok(text) => text,
            Err(e) => {
                pb.abandon();
                return Err(stage_error(e));
            }
        };
        creator
            .create_from_text(&text, &output_dir, &title, on_progress)
            .await
    } else {
        creator
            .create_from_file(&input, &output_dir, &title, on_progress)
            .await
    };

    let summary = match result {
        Ok(summary) => {
            pb.finish_with_message("done");
            summary
        }
        Err(e) => {
            pb.abandon();
            return Err(stage_error(e));
        }
    };

    report_summary(&summary);
    Ok(())
}

/// Initialize env_logger; RUST_LOG overrides the default level.
fn init_logging(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Wrap a run error with the stage it failed in.
fn stage_error(err: RunError) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("Audiobook creation failed at stage: {}", stage))
}

/// Build the speech provider from tts-client configuration.
fn create_provider(name: Option<&str>) -> Result<Box<dyn SpeechProvider>> {
    let tts_config = tts_client::Config::load().context("Failed to load TTS configuration")?;
    let name = name.unwrap_or(&tts_config.default_provider);

    let provider = tts_client::get_provider(name, tts_config.get_provider_config(name))
        .with_context(|| format!("Failed to initialize provider '{}'", name))?;
    provider
        .is_available()
        .with_context(|| format!("Provider '{}' is not available", provider.name()))?;

    Ok(provider)
}

/// Title derived from the input file name.
fn default_title(input: &Path) -> String {
    if input.as_os_str() == "-" {
        return DEFAULT_TITLE.to_string();
    }
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Read all of stdin as UTF-8 for a conversion run.
fn read_stdin<R: Read>(mut reader: R, input: &Path) -> std::result::Result<String, RunError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|source| RunError::ReadInput {
            path: input.to_path_buf(),
            source,
        })?;
    Ok(text)
}

/// Read the whole input as UTF-8, from a file or stdin.
fn read_input(input: &Path) -> Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn print_estimate(text: &str, model: Model, max_chars: usize) -> Result<()> {
    let chunks = text::split_text(text, max_chars)?;
    let estimate = Estimate::new(text, chunks.len(), model);
    println!("{}", estimate);
    Ok(())
}

fn report_summary(summary: &RunSummary) {
    eprintln!();
    eprintln!("Audiobook creation complete!");
    eprintln!("Output directory: {}", summary.output_dir.display());
    eprintln!(
        "Generated {} audio files ({} characters)",
        summary.audio_files.len(),
        group_thousands(summary.chars_synthesized)
    );
    eprintln!("Playlist: {}", summary.playlist.display());
}

fn prepare_file(input: &Path, output: &Path) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let cleaned = text::prepare_text(&text);
    std::fs::write(output, &cleaned)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Cleaned text saved to: {}", output.display());
    println!("Character count: {}", group_thousands(cleaned.chars().count()));
    println!(
        "Estimated cost ({}): ${:.2}",
        Model::HighDefinition,
        cost::estimate_cost(&cleaned, Model::HighDefinition)
    );
    Ok(())
}

fn list_voices() -> Result<()> {
    let config = AudiobookConfig::load()?;
    for voice in Voice::ALL {
        let default_marker = if voice == config.voice { " (default)" } else { "" };
        println!("  {:<8} {}{}", voice.as_str(), voice.description(), default_marker);
    }
    Ok(())
}

/// Format a count with comma thousands separators: 12345 -> "12,345".
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn handle_config_command(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = AudiobookConfig::load()?;
            println!("Configuration file: {:?}", AudiobookConfig::config_path()?);
            println!();
            println!("voice = \"{}\"", config.voice);
            println!("model = \"{}\"", config.model);
            println!("max_chars = {}", config.max_chars);
            println!("request_delay_ms = {}", config.request_delay_ms);
            println!("output_dir = \"{}\"", config.output_dir.display());
            if let Some(provider) = &config.provider {
                println!("provider = \"{}\"", provider);
            } else {
                println!("provider = (tts-client default)");
            }
        }
        ConfigAction::SetVoice { voice } => {
            let mut config = AudiobookConfig::load()?;
            config.voice = *voice;
            config.save()?;
            println!("Default voice set to: {}", voice);
        }
        ConfigAction::SetModel { model } => {
            let mut config = AudiobookConfig::load()?;
            config.model = *model;
            config.save()?;
            println!("Default model set to: {}", model);
        }
        ConfigAction::SetMaxChars { value } => {
            if *value == 0 {
                anyhow::bail!("max_chars must be at least 1");
            }
            let mut config = AudiobookConfig::load()?;
            config.max_chars = *value;
            config.save()?;
            println!("Maximum characters per request set to: {}", value);
        }
        ConfigAction::SetDelay { ms } => {
            let mut config = AudiobookConfig::load()?;
            config.request_delay_ms = *ms;
            config.save()?;
            println!("Request delay set to: {} ms", ms);
        }
        ConfigAction::SetOutputDir { path } => {
            let mut config = AudiobookConfig::load()?;
            config.output_dir = path.clone();
            config.save()?;
            println!("Default output directory set to: {}", path.display());
        }
        ConfigAction::SetApiKey { key, provider } => {
            let mut tts_config = tts_client::Config::load()?;
            let name = {
                let (name, entry) = provider_entry(&mut tts_config, provider.as_deref())?;
                entry.api_key = Some(key.clone());
                name
            };
            tts_config.save()?;
            println!("API key stored for provider: {}", name);
        }
        ConfigAction::SetBaseUrl { url, provider } => {
            let mut tts_config = tts_client::Config::load()?;
            let name = {
                let (name, entry) = provider_entry(&mut tts_config, provider.as_deref())?;
                entry.base_url = Some(url.trim_end_matches('/').to_string());
                name
            };
            tts_config.save()?;
            println!("Base URL for {} set to: {}", name, url);
        }
        ConfigAction::SetProvider { name } => {
            tts_client::ProviderKind::from_str(name)?;
            let mut config = AudiobookConfig::load()?;
            config.provider = Some(name.clone());
            config.save()?;
            println!("Default provider set to: {}", name);
        }
    }
    Ok(())
}

/// Provider entry edited by `config set-api-key` / `set-base-url`.
fn provider_entry<'a>(
    config: &'a mut tts_client::Config,
    provider: Option<&str>,
) -> Result<(String, &'a mut ProviderConfig)> {
    let name = provider
        .map(str::to_string)
        .unwrap_or_else(|| config.default_provider.clone());
    tts_client::ProviderKind::from_str(&name)?;
    let entry = config.provider_mut(&name);
    Ok((name, entry))
}

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tagsmith::config::Config;
use tagsmith::llm::CompletionClientBuilder;
use tagsmith::telemetry::init_tracing;
use tagsmith::{RawInput, TagGenerator, TagGeneratorBuilder, TagList, TaggingError};
use tokio::io::AsyncReadExt;

/// tagsmith - LLM-generated descriptive tags for arbitrary content
#[derive(Parser)]
#[command(name = "tagsmith")]
#[command(about = "Generate descriptive key/value tags for content using an LLM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),
    /// Generate tags once and print them
    Tag(TagCommand),
}

/// Run the HTTP server
#[derive(Parser)]
struct ServeCommand {
    /// Port to listen on (overrides PORT)
    #[arg(short, long, value_name = "PORT")]
    port: Option<u16>,

    /// Address to bind (overrides TAGSMITH_BIND)
    #[arg(long, value_name = "ADDR")]
    bind: Option<String>,
}

/// Generate tags for text, a file, or stdin
#[derive(Parser)]
struct TagCommand {
    /// Text to tag; reads stdin when neither TEXT nor --file is given
    #[arg(value_name = "TEXT")]
    text: Option<String>,

    /// Read the content from a file
    #[arg(short, long, value_name = "PATH", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Treat the content as a JSON value instead of plain text
    #[arg(long)]
    parse_json: bool,

    /// Print the tags as a JSON array
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    match cli.command {
        Commands::Serve(cmd) => {
            if let Some(port) = cmd.port {
                config.server.port = port;
            }
            if let Some(bind) = cmd.bind {
                config.server.bind = bind;
            }

            let generator = build_generator(&config)?;
            tracing::info!(
                provider = %config.provider.name,
                model = %generator.model(),
                "Tag generator ready"
            );
            tagsmith::server::run_server(&config.bind_addr(), generator).await
        }
        Commands::Tag(cmd) => {
            let input = read_input(&cmd).await?;
            let generator = build_generator(&config)?;
            let tags = generator.generate_tags(&input).await?;
            println!("{}", format_tags(&tags, cmd.json)?);
            Ok(())
        }
    }
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are problems with the supplied input; everything else
/// (configuration, provider, network, unusable model output) is internal.
fn is_user_error(error: &anyhow::Error) -> bool {
    if error.chain().any(|cause| cause.is::<TaggingError>()) {
        return false;
    }

    let error_msg = format!("{error:#}");
    error_msg.contains("cannot be empty") || error_msg.contains("Input could not be parsed")
}

/// Builds the completion client and tag generator from configuration.
fn build_generator(config: &Config) -> Result<Arc<TagGenerator>> {
    let mut builder = CompletionClientBuilder::new()
        .base_url(&config.provider.base_url)
        .timeout(config.timeout());
    if let Some(key) = &config.provider.api_key {
        builder = builder.api_key(key);
    }
    let client = builder
        .build()
        .context("Failed to create completion client")?;

    let generator = TagGeneratorBuilder::new(Arc::new(client))
        .model(config.model()?)
        .max_input_chars(config.tagging.max_input_chars)
        .max_tags(config.tagging.max_tags)
        .build();

    Ok(Arc::new(generator))
}

/// Reads the content for the `tag` command from its argument, a file, or
/// stdin.
async fn read_input(cmd: &TagCommand) -> Result<RawInput> {
    let raw = if let Some(text) = &cmd.text {
        text.clone()
    } else if let Some(path) = &cmd.file {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    } else {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read stdin")?;
        buf
    };

    parse_input(raw, cmd.parse_json)
}

fn parse_input(raw: String, parse_json: bool) -> Result<RawInput> {
    let input = if parse_json {
        let value: serde_json::Value =
            serde_json::from_str(&raw).context("Input could not be parsed as JSON")?;
        RawInput::from(value)
    } else {
        RawInput::Text(raw)
    };

    if input.is_falsy() {
        anyhow::bail!("Input cannot be empty");
    }

    Ok(input)
}

/// Renders tags as `name: value` lines or as a pretty JSON array.
fn format_tags(tags: &TagList, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(tags).context("Failed to serialize tags");
    }

    Ok(tags
        .iter()
        .map(|tag| format!("{}: {}", tag.name(), tag.value()))
        .collect::<Vec<_>>()
        .join("\n"))
}

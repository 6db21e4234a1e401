mod command_file;
mod console;
mod terminal_output;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing::info;

use parley_commands::{ArgumentCollector, CollectorResult, Conversation, TypeRegistry};
use parley_config::defaults::{DEFAULT_CONSOLE_CHANNEL, DEFAULT_CONSOLE_USER};
use parley_config::{config_dir, config_file_path, load_and_prepare, ParleyConfig};
use parley_core::ChatMessage;

use command_file::{CommandFile, ListedEntities};
use console::ConsoleTransport;
use terminal_output::{note_error, note_success, note_warn, render_table, supports_color};

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Resolve chat command arguments by conversation")]
#[command(version)]
struct Cli {
    /// Config file (default: $PARLEY_CONFIG_DIR/config.yaml or ~/.parley/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a command's arguments, prompting on the terminal for anything missing
    Resolve {
        /// YAML file declaring the arguments
        #[arg(long = "args")]
        args: PathBuf,
        /// Prompts allowed per argument (overrides the config)
        #[arg(long)]
        prompt_limit: Option<usize>,
        /// Values typed with the command, in argument order
        values: Vec<String>,
    },
    /// Check an argument file for declaration errors
    Check {
        #[arg(long = "args")]
        args: PathBuf,
    },
    /// List registered value types
    Types,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(|| config_file_path(&config_dir()));
    let config = load_and_prepare(&config_path).await?;
    parley_logging::init_logger(config.log_level(), config.log_dir().map(Path::new));

    match cli.command {
        Commands::Resolve { args, prompt_limit, values } => {
            resolve(&config, &args, prompt_limit, values).await
        }
        Commands::Check { args } => check(&config, &args).await,
        Commands::Types => {
            list_types();
            Ok(())
        }
    }
}

/// Build the registry and collector an argument file describes.
fn build_collector(
    config: &ParleyConfig,
    file: &CommandFile,
) -> Result<ArgumentCollector> {
    let registry = TypeRegistry::with_defaults();
    registry.register_entity_types(Arc::new(ListedEntities::new(file.entities.clone())))?;
    let collector = ArgumentCollector::new(
        file.definitions(config.default_wait_secs()),
        &registry,
        config.prompt_limit(),
    )
    .with_context(|| format!("Invalid arguments for \"{}\"", file.display_name()))?;
    Ok(collector)
}

async fn resolve(
    config: &ParleyConfig,
    path: &Path,
    prompt_limit: Option<usize>,
    values: Vec<String>,
) -> Result<()> {
    let file = CommandFile::load(path).await?;
    let collector = build_collector(config, &file)?;

    let console = config.console.clone().unwrap_or_default();
    let user = console.user_id.unwrap_or_else(|| DEFAULT_CONSOLE_USER.into());
    let channel = console.channel_id.unwrap_or_else(|| DEFAULT_CONSOLE_CHANNEL.into());
    let content = format!("{} {}", file.display_name(), values.join(" "));
    let trigger = ChatMessage::new(channel, user, content.trim_end());

    let conv = Conversation::new(Arc::new(ConsoleTransport::new(supports_color())));
    info!(command = %file.display_name(), provided = values.len(), "Resolving arguments");
    let result = collector.obtain(&conv, &trigger, &values, prompt_limit).await?;

    match result.cancelled {
        Some(reason) => {
            note_warn(&format!("Cancelled ({reason}) after {} prompt(s)", result.prompts.len()));
        }
        None => println!("{}", serde_json::to_string_pretty(&values_json(&result))?),
    }
    Ok(())
}

fn values_json(result: &CollectorResult) -> Value {
    let mut values = Map::new();
    for (key, value) in result.values.iter().flatten() {
        values.insert(key.clone(), json!(value));
    }
    Value::Object(values)
}

async fn check(config: &ParleyConfig, path: &Path) -> Result<()> {
    let file = CommandFile::load(path).await?;
    match build_collector(config, &file) {
        Ok(collector) => {
            note_success(&format!(
                "\"{}\" declares {} valid argument(s)",
                file.display_name(),
                collector.arguments().len()
            ));
            Ok(())
        }
        Err(e) => {
            note_error(&format!("{e:#}"));
            std::process::exit(1);
        }
    }
}

fn list_types() {
    let registry = TypeRegistry::with_defaults();
    if let Err(e) = registry.register_entity_types(Arc::new(ListedEntities::new(Vec::new()))) {
        note_error(&e.to_string());
    }
    let rows: Vec<Vec<String>> = registry
        .ids()
        .into_iter()
        .map(|id| {
            let kind = match id.as_str() {
                "user" | "channel" | "role" => "entity",
                _ => "scalar",
            };
            vec![id, kind.to_string()]
        })
        .collect();
    print!("{}", render_table(&["Type", "Kind"], &rows));
}

//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;
use tracing::debug;

use poextract_core::models::config::PoConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "scan.max_depth")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, explicit: Option<&str>) -> anyhow::Result<()> {
    let path = config_path(explicit);
    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("poextract")
        .join("config.json")
}

/// File managed by the config subcommands: `--config` when given.
fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Read `path`, falling back to defaults when it does not exist yet.
fn load_or_default(path: &Path) -> anyhow::Result<PoConfig> {
    if path.exists() {
        Ok(PoConfig::from_file(path)?)
    } else {
        Ok(PoConfig::default())
    }
}

/// Load the configuration used by processing commands.
///
/// An explicit path must exist; otherwise the default file is used when
/// present, and built-in defaults when not.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<PoConfig> {
    if let Some(path) = explicit {
        let path = Path::new(path);
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return Ok(PoConfig::from_file(path)?);
    }

    let default_path = default_config_path();
    if default_path.is_file() {
        debug!("Using config from {}", default_path.display());
        Ok(PoConfig::from_file(&default_path)?)
    } else {
        Ok(PoConfig::default())
    }
}

fn show_config(config_path: &Path) -> anyhow::Result<()> {
    let config = if config_path.exists() {
        PoConfig::from_file(config_path)?
    } else {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
        PoConfig::default()
    };

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, config_path: PathBuf) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or(config_path);

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    PoConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Follow a dotted key through a JSON object.
fn lookup<'a>(json: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(json, |current, part| current.get(part))
}

/// Replace the value at a dotted key; only existing keys can be set.
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let mut current = json;
    for part in key.split('.') {
        current = current
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    }
    if current.is_object() {
        anyhow::bail!("Cannot replace configuration section: {}", key);
    }
    *current = value;
    Ok(())
}

fn get_config(config_path: &Path, key: &str) -> anyhow::Result<()> {
    let config = load_or_default(config_path)?;
    let json = serde_json::to_value(&config)?;

    let value = lookup(&json, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(config_path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let config = load_or_default(config_path)?;

    // Bare words are taken as strings
    let parsed_value: Value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));

    let mut json = serde_json::to_value(&config)?;
    assign(&mut json, key, parsed_value.clone())?;

    let config: PoConfig = serde_json::from_value(json)?;
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(config_path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path(config_path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", config_path.display());

    if config_path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'poextract config init' to create a configuration file.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_and_assign() {
        let mut json = serde_json::to_value(PoConfig::default()).unwrap();

        assert_eq!(lookup(&json, "scan.max_depth"), Some(&Value::from(1)));
        assert!(lookup(&json, "scan.nope").is_none());

        assign(&mut json, "export.format", Value::from("xlsx")).unwrap();
        let config: PoConfig = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(config.export.format, poextract_core::ExportFormat::Xlsx);

        assert!(assign(&mut json, "export", Value::from(1)).is_err());
        assert!(assign(&mut json, "export.unknown", Value::from(1)).is_err());
    }

    #[test]
    fn test_config_path_prefers_explicit() {
        assert_eq!(config_path(Some("team.json")), PathBuf::from("team.json"));
        assert_eq!(config_path(None), default_config_path());
    }

    #[test]
    fn test_explicit_config_must_exist() {
        assert!(load_config(Some("/definitely/not/here.json")).is_err());
    }
}

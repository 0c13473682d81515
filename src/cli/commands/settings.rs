//! Config file commands.

use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::config::{self, Config, ConfigError, SETTABLE_KEYS};
use crate::error::{Error, ResultExt};

/// What to do with the config file
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print where the config file lives
    Path,
    /// Print the effective settings (API key masked)
    Show,
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Change one setting, e.g. `config set chat.provider ollama`
    Set { key: String, value: String },
}

/// Run a config subcommand against `config` as loaded from `path`
/// (or the default location).
pub fn cmd_config(config: Config, path: Option<&Path>, action: &ConfigAction) -> anyhow::Result<()> {
    let target = target_path(path)?;

    match action {
        ConfigAction::Path => println!("{}", target.display()),
        ConfigAction::Show => {
            let mut shown = config;
            if shown.chat.api_key.is_some() {
                shown.chat.api_key = Some("********".to_string());
            }
            print!("{}", toml::to_string_pretty(&shown)?);
        }
        ConfigAction::Init { force } => {
            if init_config(&target, *force)? {
                println!("✓ Wrote default config to {}", target.display());
            } else {
                println!(
                    "✗ {} already exists (use --force to overwrite)",
                    target.display()
                );
            }
        }
        ConfigAction::Set { key, value } => {
            set_value(config, &target, key, value)?;
            println!("✓ {} = {:?}", key, value.trim());
        }
    }
    Ok(())
}

fn target_path(path: Option<&Path>) -> Result<PathBuf, Error> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(config::config_path().ok_or(ConfigError::NoConfigDir)?),
    }
}

/// Write defaults to `path`. Returns false if a file is there and `force` is off.
fn init_config(path: &Path, force: bool) -> Result<bool, Error> {
    if path.exists() && !force {
        return Ok(false);
    }
    config::save_to(&Config::default(), path)?;
    Ok(true)
}

fn set_value(mut config: Config, path: &Path, key: &str, value: &str) -> Result<(), Error> {
    config.set(key, value).with_context(format!(
        "settable keys are: {}",
        SETTABLE_KEYS.join(", ")
    ))?;
    config::save_to(&config, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChatProviderKind;

    #[test]
    fn test_set_value_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        set_value(Config::default(), &path, "chat.provider", "ollama").unwrap();
        let loaded = config::load_from(&path);
        set_value(loaded, &path, "catalog.search_limit", "3").unwrap();

        let loaded = config::load_from(&path);
        assert_eq!(loaded.chat.provider, ChatProviderKind::Ollama);
        assert_eq!(loaded.catalog.search_limit, 3);
    }

    #[test]
    fn test_set_value_unknown_key_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let err = set_value(Config::default(), &path, "chat.colour", "blue").unwrap_err();

        assert!(err.to_string().contains("chat.provider"));
        assert!(matches!(
            err,
            Error::WithContext { ref source, .. } if matches!(**source, Error::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_init_respects_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(init_config(&path, false).unwrap());
        set_value(Config::default(), &path, "chat.model", "llama3").unwrap();

        assert!(!init_config(&path, false).unwrap());
        assert_eq!(config::load_from(&path).chat.model.as_deref(), Some("llama3"));

        assert!(init_config(&path, true).unwrap());
        assert_eq!(config::load_from(&path).chat.model, None);
    }

    #[test]
    fn test_cmd_config_set_through_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let action = ConfigAction::Set {
            key: "chat.provider".to_string(),
            value: "anthropic".to_string(),
        };

        cmd_config(Config::default(), Some(&path), &action).unwrap();

        assert_eq!(
            config::load_from(&path).chat.provider,
            ChatProviderKind::Anthropic
        );
    }
}

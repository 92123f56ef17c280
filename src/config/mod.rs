use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    pub catalog: Option<String>,
    pub storage: Option<String>,
    pub storage_key: Option<String>,
    #[serde(alias = "on_corrupt_storage")]
    pub corrupt_storage: Option<String>,
    pub scroll_threshold: Option<f64>,
    pub newsletter_notice: Option<String>,
    pub title: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn app_dir() -> Option<PathBuf> {
    Some(home_dir()?.join(".toolshelf"))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(app_dir()?.join("config.yml"))
}

pub fn default_storage_path() -> Option<PathBuf> {
    Some(app_dir()?.join("storage.json"))
}

pub fn default_catalog_path() -> Option<PathBuf> {
    Some(app_dir()?.join("catalog.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# Toolshelf config
#
# Location (default):
#   ~/.toolshelf/config.yml

# Catalog file (YAML or JSON): category -> list of resources
catalog: ~/.toolshelf/catalog.yml

# Toolkit persistence
storage: ~/.toolshelf/storage.json
storage_key: myToolkit

# What to do when the stored toolkit is not a JSON array of ids:
#   discard  log a warning and start empty
#   reject   stop with an error
corrupt_storage: discard

# Page behavior
scroll_threshold: 300
newsletter_notice: "Thank you for subscribing! We'll keep you updated."
title: Toolshelf

# Output
# output_format: html
no_color: false
"#
    .to_string()
}

/// Writes the commented default config unless a file already exists.
/// Returns whether a file was written.
pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

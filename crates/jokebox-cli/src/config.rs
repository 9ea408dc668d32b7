// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use jokebox_source::DEFAULT_ENDPOINT;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const APP_NAME: &str = "jokebox";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TIMEOUT: &str = "10s";
const DEFAULT_REVEAL_DELAY: &str = "600ms";
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub logging: Logging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            source: Source::default(),
            ui: Ui::default(),
            logging: Logging::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub endpoint: Option<String>,
    pub timeout: Option<String>,
    pub reveal_delay: Option<String>,
}

impl Default for Source {
    fn default() -> Self {
        Self {
            endpoint: Some(DEFAULT_ENDPOINT.to_owned()),
            timeout: Some(DEFAULT_TIMEOUT.to_owned()),
            reveal_delay: Some(DEFAULT_REVEAL_DELAY.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Ui {
    pub emoji_seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Logging {
    pub level: Option<String>,
    pub file: Option<bool>,
    pub dir: Option<String>,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
            file: Some(true),
            dir: None,
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("JOKEBOX_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set JOKEBOX_CONFIG_PATH to the config file")
        })?;

        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} has no version; add `version = 1` and keep values under [source], [ui], and [logging]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(endpoint) = &self.source.endpoint {
            let parsed = Url::parse(endpoint.trim()).with_context(|| {
                format!(
                    "source.endpoint in {} is not a valid URL: {endpoint:?}",
                    path.display()
                )
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                bail!(
                    "source.endpoint in {} must use http or https, got {}",
                    path.display(),
                    parsed.scheme()
                );
            }
        }

        if let Some(timeout) = &self.source.timeout {
            let parsed = parse_duration(timeout)?;
            if parsed <= Duration::ZERO {
                bail!(
                    "source.timeout in {} must be positive, got {}",
                    path.display(),
                    timeout
                );
            }
        }

        if let Some(delay) = &self.source.reveal_delay {
            parse_duration(delay)?;
        }

        if let Some(level) = &self.logging.level
            && !LOG_LEVELS.contains(&level.as_str())
        {
            bail!(
                "logging.level in {} must be one of {}, got {level:?}",
                path.display(),
                LOG_LEVELS.join(", ")
            );
        }

        Ok(())
    }

    pub fn source_endpoint(&self) -> &str {
        self.source
            .endpoint
            .as_deref()
            .unwrap_or(DEFAULT_ENDPOINT)
            .trim()
    }

    pub fn source_timeout(&self) -> Result<Duration> {
        parse_duration(self.source.timeout.as_deref().unwrap_or(DEFAULT_TIMEOUT))
    }

    pub fn reveal_delay(&self) -> Result<Duration> {
        parse_duration(
            self.source
                .reveal_delay
                .as_deref()
                .unwrap_or(DEFAULT_REVEAL_DELAY),
        )
    }

    pub fn emoji_seed(&self) -> Option<u64> {
        self.ui.emoji_seed
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_to_file(&self) -> bool {
        self.logging.file.unwrap_or(true)
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.logging.dir {
            return Ok(PathBuf::from(dir));
        }
        let data_root = dirs::data_dir().ok_or_else(|| {
            anyhow!("cannot resolve data directory; set [logging].dir in the config")
        })?;
        Ok(data_root.join(APP_NAME))
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# jokebox config\n# Place this file at: {}\n\nversion = 1\n\n[source]\nendpoint = \"{}\"\ntimeout = \"{}\"\n# Pause after a joke arrives, before it is shown.\nreveal_delay = \"{}\"\n\n[ui]\n# Optional. Fixes the emoji sequence.\n# emoji_seed = 42\n\n[logging]\nlevel = \"{}\"\nfile = true\n# Optional. Default is the platform data dir (for example ~/.local/share/jokebox)\n# dir = \"/absolute/path/to/logs\"\n",
            path.display(),
            DEFAULT_ENDPOINT,
            DEFAULT_TIMEOUT,
            DEFAULT_REVEAL_DELAY,
            DEFAULT_LOG_LEVEL,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 600ms or 10s)")
}

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;

use crate::types::ScreenBounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Jsonl,
    Csv,
}

impl InputFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "jsonl" | "json" => Some(InputFormat::Jsonl),
            "csv" => Some(InputFormat::Csv),
            _ => None,
        }
    }
}

/// Run-time settings. Gesture thresholds are fixed and deliberately absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Landmark source file, or `-` for stdin
    pub input: String,
    pub format: InputFormat,
    /// `WIDTHxHEIGHT`; queried from the primary monitor when unset
    pub screen: Option<String>,
    pub screenshot_dir: PathBuf,
    pub device_name: String,
    /// Log actions instead of injecting them
    pub dry_run: bool,
    /// Watch the keyboard for `q`
    pub quit_key: bool,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input: "-".to_string(),
            format: InputFormat::Jsonl,
            screen: None,
            screenshot_dir: PathBuf::from("."),
            device_name: "handmouse-hid".to_string(),
            dry_run: false,
            quit_key: true,
            log_level: "info".to_string(),
        }
    }
}

pub const USAGE: &str = "Uso: handmouse [--config <file.toml>] [--input <file|->] [--format jsonl|csv] \
[--screen ANCHOxALTO] [--screenshot-dir <dir>] [--device-name <name>] [--dry-run] [--no-quit-key] \
[--log-level <level>]";

impl AppConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("No se pudo leer la configuración {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("Configuración inválida en {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the configuration from `--config` (if given) and then applies
    /// the remaining flags on top of it.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();

        let mut config = match args.iter().position(|a| a == "--config") {
            Some(idx) => {
                let path = args
                    .get(idx + 1)
                    .ok_or_else(|| anyhow!("--config necesita una ruta\n{}", USAGE))?;
                Self::from_toml_file(path)?
            }
            None => Self::default(),
        };

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            let mut value = |name: &str| {
                iter.next()
                    .ok_or_else(|| anyhow!("{} necesita un valor\n{}", name, USAGE))
            };
            match arg.as_str() {
                "--config" => {
                    value("--config")?;
                }
                "--input" => config.input = value("--input")?,
                "--format" => {
                    let raw = value("--format")?;
                    config.format = InputFormat::parse(&raw)
                        .ok_or_else(|| anyhow!("Formato desconocido '{}'", raw))?;
                }
                "--screen" => config.screen = Some(value("--screen")?),
                "--screenshot-dir" => config.screenshot_dir = PathBuf::from(value("--screenshot-dir")?),
                "--device-name" => config.device_name = value("--device-name")?,
                "--log-level" => config.log_level = value("--log-level")?,
                "--dry-run" => config.dry_run = true,
                "--no-quit-key" => config.quit_key = false,
                other => bail!("Argumento desconocido '{}'\n{}", other, USAGE),
            }
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.screen_override()?;
        Ok(())
    }

    pub fn screen_override(&self) -> Result<Option<ScreenBounds>> {
        match &self.screen {
            Some(raw) => ScreenBounds::parse(raw)
                .map(Some)
                .ok_or_else(|| anyhow!("Tamaño de pantalla inválido '{}', se esperaba ANCHOxALTO", raw)),
            None => Ok(None),
        }
    }

    pub fn reads_stdin(&self) -> bool {
        self.input == "-"
    }
}

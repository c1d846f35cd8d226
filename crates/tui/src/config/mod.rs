use chrono_tz::Tz;
use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/capital_flow.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// IANA zone used for day boundaries and displayed times.
    pub timezone: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    /// Log file; logging is off when unset since the terminal belongs to the UI.
    pub log_file: Option<String>,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            timezone: "Europe/Rome".to_string(),
            page_size: 20,
            request_timeout_secs: 10,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::Timezone(format!("{}: {err}", self.timezone)))
    }
}

#[derive(Debug, Parser)]
#[command(name = "capital_flow", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override rows per page.
    #[arg(long)]
    page_size: Option<u32>,
    /// Write logs to this file.
    #[arg(long)]
    log_file: Option<String>,
    /// Log level filter (e.g. debug, info, flow_browser=debug).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("CAPITAL_FLOW"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(page_size) = args.page_size {
        settings.page_size = page_size;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = Some(log_file);
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_timezone() {
        let config = AppConfig::default();
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Rome);
        assert_eq!(config.page_size, 20);
    }

    #[test]
    fn bad_timezone_is_reported() {
        let config = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(config.timezone(), Err(AppError::Timezone(_))));
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let settings: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "base_url = \"http://ledger.local\"\npage_size = 50",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.base_url, "http://ledger.local");
        assert_eq!(settings.page_size, 50);
        assert_eq!(settings.log_level, "info");
    }
}

use crate::config::toml_config::RosterConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "referee-roster")]
#[command(about = "Browse, search, schedule and rate football referees")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "roster-config.toml")]
    pub config: String,

    /// Override the referee collection URL from the config
    #[arg(long)]
    pub base_url: Option<String>,

    /// Override the first-name lookup URL prefix
    #[arg(long)]
    pub first_name_url: Option<String>,

    /// Override the last-name lookup URL prefix
    #[arg(long)]
    pub last_name_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl CliArgs {
    /// Loads the config file when present, falls back to defaults when it
    /// is not, then applies command-line overrides.
    pub fn load_config(&self) -> Result<RosterConfig> {
        let mut config = if Path::new(&self.config).exists() {
            RosterConfig::from_file(&self.config)?
        } else {
            tracing::warn!("Config file '{}' not found, using defaults", self.config);
            RosterConfig::default()
        };

        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(url) = &self.first_name_url {
            config.api.first_name_url = url.clone();
        }
        if let Some(url) = &self.last_name_url {
            config.api.last_name_url = url.clone();
        }

        Ok(config)
    }
}

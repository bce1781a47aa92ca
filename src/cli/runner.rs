//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::client::JQuantsClient;
use crate::config::ClientConfig;
use crate::error::{Result, ResultExt};
use serde::Serialize;
use std::fs;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = JQuantsClient::new(self.load_config()?)?;

        match &self.cli.command {
            Commands::Master { code, date } => {
                let record = client.fetch_master_record(code, date.as_deref()).await?;
                self.emit(&record)
            }
            Commands::MasterAll { date } => {
                let records = client.fetch_all_master_records(date.as_deref()).await?;
                info!("{} master records", records.len());
                self.emit(&records)
            }
            Commands::Statements { code, date } => {
                let records = client
                    .fetch_statements(code.as_deref(), date.as_deref())
                    .await?;
                info!("{} statement records", records.len());
                self.emit(&records)
            }
        }
    }

    /// Build the client config: file (or defaults), then environment, then flags
    pub fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ClientConfig::default(),
        };

        config.apply_env()?;

        if let Some(key) = &self.cli.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(url) = &self.cli.base_url {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Write a value to the output file or stdout
    fn emit<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = render(value, self.cli.format)?;

        match &self.cli.output {
            Some(path) => {
                fs::write(path, rendered)?;
                info!("Wrote output to {}", path.display());
            }
            None => print!("{rendered}"),
        }
        Ok(())
    }
}

/// Render a value in the requested format, newline-terminated
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let mut rendered = match format {
        OutputFormat::Json => serde_json::to_string(value)?,
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("command", &self.cli.command)
            .finish_non_exhaustive()
    }
}

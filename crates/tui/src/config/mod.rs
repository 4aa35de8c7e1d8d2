use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/tui.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    /// Where cart, table number and order history are kept between runs.
    pub state_path: PathBuf,
    /// Defaults to `tableorder_tui.log` next to the state file.
    pub log_path: Option<PathBuf>,
    pub level: String,
    pub currency: String,
    pub timezone: String,
    /// Table number handed over at launch (`--table`).
    pub table: Option<String>,
    /// Scanned table link handed over at launch (`--link`).
    pub link: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".to_string(),
            state_path: PathBuf::from("config/tui_state.json"),
            log_path: None,
            level: "info".to_string(),
            currency: "Rp".to_string(),
            timezone: "Asia/Jakarta".to_string(),
            table: None,
            link: None,
        }
    }
}

impl AppConfig {
    pub fn log_path(&self) -> PathBuf {
        match &self.log_path {
            Some(path) => path.clone(),
            None => self
                .state_path
                .parent()
                .map(|dir| dir.join("tableorder_tui.log"))
                .unwrap_or_else(|| PathBuf::from("tableorder_tui.log")),
        }
    }

    pub fn timezone(&self) -> Result<chrono_tz::Tz> {
        self.timezone
            .parse()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }
}

#[derive(Debug, Parser)]
#[command(name = "tableorder_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000).
    #[arg(long)]
    base_url: Option<String>,
    /// Table number to order for, as printed on the table.
    #[arg(long)]
    table: Option<String>,
    /// Full link from a table QR code (e.g. `http://host:3000/?table=A1`).
    #[arg(long, conflicts_with = "table")]
    link: Option<String>,
    /// Override the local state file.
    #[arg(long)]
    state: Option<PathBuf>,
    /// Override the currency prefix shown before prices.
    #[arg(long)]
    currency: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TABLEORDER_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(table) = args.table {
        settings.table = Some(table);
    }
    if let Some(link) = args.link {
        settings.link = Some(link);
    }
    if let Some(state) = args.state {
        settings.state_path = state;
    }
    if let Some(currency) = args.currency {
        settings.currency = currency;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }

    Ok(settings)
}

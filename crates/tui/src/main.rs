mod app;
mod checkout;
mod client;
mod config;
mod error;
mod store;
mod ui;

use std::{fs::OpenOptions, sync::Mutex};

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // The terminal belongs to the UI, so logs go to a file.
    let log_path = config.log_path();
    if let Some(dir) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(format!("tableorder_tui={}", config.level))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    let mut app = app::App::new(config)?;
    app.run().await
}

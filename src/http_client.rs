use anyhow::{Context, Result};
use reqwest::blocking::Client;

use crate::config::AppConfig;

const USER_AGENT: &str = concat!("bet_analyzer/", env!("CARGO_PKG_VERSION"));

pub fn http_client(config: &AppConfig) -> Result<Client> {
    let mut builder = Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("failed to build http client")
}

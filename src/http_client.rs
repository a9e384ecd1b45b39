use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

use crate::config::DEFAULT_REQUEST_TIMEOUT_SECS;

static CLIENT: OnceCell<Client> = OnceCell::new();
static TIMEOUT: OnceCell<Duration> = OnceCell::new();

/// Sets the transport timeout. Only the first call before the client is
/// built has any effect.
pub fn configure_timeout(timeout: Duration) {
    let _ = TIMEOUT.set(timeout);
}

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        let timeout = TIMEOUT
            .get()
            .copied()
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
        Client::builder()
            .timeout(timeout)
            .user_agent(concat!("scoreboard_terminal/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")
    })
}

use std::path::Path;

use anyhow::Result;
use grind_core::config::Config;

pub fn run(config_path: Option<&Path>, port: Option<u16>) -> Result<()> {
    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }
    if config.api_token.is_empty() {
        tracing::warn!("no API token configured; account endpoints will be rejected upstream");
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(grind_server::serve(config))
}

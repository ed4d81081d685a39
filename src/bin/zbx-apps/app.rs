use std::io::Write;
use std::path::Path;

use tracing::{debug, info};
use zbx_apps::Result;
use zbx_apps::config::Config;
use zbx_apps::telemetry::init_tracing;
use zbx_apps::zbx_client::ZbxClient;

use super::cli::Cli;
use super::output::render;

const DEFAULT_CONFIG: &str = "config.toml";

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config = match cli.config.as_deref() {
        Some(path) => Config::from_required_file(path)?,
        None => Config::from_env_and_file(Path::new(DEFAULT_CONFIG))?,
    };
    let client = ZbxClient::from_config(&config, cli.insecure)?;

    let query = cli.filters.into_query();
    debug!(?query, "querying applications");
    let applications = client.applications(&query).await?;
    info!(count = applications.len(), "applications retrieved");

    let rendered = render(&applications, cli.format)?;
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .and_then(|()| stdout.flush())?;
    Ok(())
}

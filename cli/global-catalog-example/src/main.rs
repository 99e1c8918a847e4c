use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use global_catalog::{CatalogClient, CatalogClientConfig, CatalogMockMode, CatalogSettings};
use logger::init_logger;
use tracing::debug;

mod logger;
mod scenario;

type Error = anyhow::Error;

/// Walk a catalog entry through its whole lifecycle.
///
/// The service and credentials are read from `global-catalog.toml`
/// and `GLOBAL_CATALOG_*` environment variables.
#[derive(Debug, Parser)]
#[command()]
pub struct Cli {
    /// Id of the entry to create, a random UUID by default
    #[arg(long)]
    pub id: Option<String>,

    /// Where to write debug logs
    #[arg(short, long = "log-file")]
    pub log_path: Option<PathBuf>,

    /// Record the traffic with the service to a file
    #[arg(long, conflicts_with = "replay")]
    pub record: Option<PathBuf>,

    /// Replay previously recorded traffic instead of calling the service
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Leave the entry in the catalog instead of deleting it at the end
    #[arg(long)]
    pub keep: bool,
}

impl Cli {
    fn mock_mode(&self) -> CatalogMockMode {
        match (&self.record, &self.replay) {
            (Some(path), _) => CatalogMockMode::Record(path.clone()),
            (None, Some(path)) => CatalogMockMode::Replay(path.clone()),
            (None, None) => CatalogMockMode::None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Cli::parse();
    init_logger(args.log_path.clone()).context("failed to init logger")?;

    let settings = CatalogSettings::load().context("failed to load catalog settings")?;
    let config = CatalogClientConfig {
        mock_mode: args.mock_mode(),
        ..CatalogClientConfig::try_from(settings).context("invalid catalog settings")?
    };
    debug!(service_url = %config.service_url, mock_mode = ?config.mock_mode, "starting");

    let client = CatalogClient::new(config).context("failed to create catalog client")?;
    let id = args
        .id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    scenario::run(&client, &id, args.keep).await?;
    debug!("finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_replay_conflict() {
        let result =
            Cli::try_parse_from(["global-catalog-example", "--record", "a", "--replay", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn mock_mode_from_args() {
        let cli = Cli::try_parse_from(["global-catalog-example", "--replay", "traffic.json"])
            .unwrap();
        assert_eq!(
            cli.mock_mode(),
            CatalogMockMode::Replay(PathBuf::from("traffic.json"))
        );

        let cli = Cli::try_parse_from(["global-catalog-example", "--keep"]).unwrap();
        assert_eq!(cli.mock_mode(), CatalogMockMode::None);
        assert!(cli.keep);
    }
}

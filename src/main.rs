mod error;

use crate::error::{ErrorKind, Result};
use albumcopy_config::{Credentials, DESTINATION_ENV_PREFIX, RunConfig, SOURCE_ENV_PREFIX};
use albumcopy_library::{DEFAULT_TEMPLATE_MULTIPLE, DEFAULT_TEMPLATE_SINGLE, NameGenerator, SummaryEntry};
use albumcopy_library::{UploadPlanner, UrlMapping};
use albumcopy_source::backend::{PhotoSource, VkSource};
use albumcopy_source::{Zone, build_catalog};
use albumcopy_storage::backend::{ReadOnlyBackend, YandexDiskBackend};
use albumcopy_storage::{BackendHandle, CopyReport, DestinationStore};
use clap::Parser;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str = "albumcopy=info";

/// Back up the largest version of each photo on a VK wall album to a Yandex
/// Disk folder, one file per photo, named after its like count.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Photo source credentials ([TOKEN] table with token and user_id)
    #[arg(long, default_value = "vk_settings.toml")]
    source_config: PathBuf,
    /// Destination credentials ([TOKEN] table with token and user_id)
    #[arg(long, default_value = "ya_settings.toml")]
    destination_config: PathBuf,
    /// Run configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Where to write the JSON summary
    #[arg(long)]
    output: Option<PathBuf>,
    /// Destination folder
    #[arg(long)]
    folder: Option<String>,
    /// Maximum number of new files to copy
    #[arg(long)]
    count: Option<usize>,
    /// Give every file its own photo instead of the first photo with the same like count
    #[arg(long)]
    map_each_entry: bool,
    /// Log what would be created and uploaded without changing the destination
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    /// Command-line flags take precedence over every other configuration layer.
    fn apply(&self, mut config: RunConfig) -> RunConfig {
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(folder) = &self.folder {
            config.folder = folder.clone();
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        config.map_each_entry |= self.map_each_entry;
        config
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Could not start the async runtime: {e}");
            return ExitCode::FAILURE;
        },
    };
    match runtime.block_on(run(&args)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: &Args) -> Result<CopyReport> {
    let config = args.apply(RunConfig::load(args.config.as_ref()).or_raise(|| ErrorKind::Config)?);
    let source_credentials =
        Credentials::load(&args.source_config, SOURCE_ENV_PREFIX).or_raise(|| ErrorKind::Config)?;
    let destination_credentials =
        Credentials::load(&args.destination_config, DESTINATION_ENV_PREFIX).or_raise(|| ErrorKind::Config)?;

    let source =
        VkSource::new("vk", source_credentials.token, &config.api_version).or_raise(|| ErrorKind::Source)?;
    let mut destination: BackendHandle = Arc::new(
        YandexDiskBackend::new("yandex", destination_credentials.token).or_raise(|| ErrorKind::Destination)?,
    );
    if args.dry_run {
        tracing::info!("Dry run: the destination will not be modified");
        destination = Arc::new(ReadOnlyBackend::new(destination));
    }

    backup(&source, &source_credentials.user_id, destination, &config, &chrono::Local).await
}

/// Catalogue the album, write the summary, then copy into the destination.
///
/// Photo dates are rendered in `zone`, at the offset in effect when each
/// photo was uploaded.
async fn backup(
    source: &dyn PhotoSource,
    owner_id: &str,
    destination: BackendHandle,
    config: &RunConfig,
    zone: &dyn Zone,
) -> Result<CopyReport> {
    let catalog = build_catalog(source, owner_id, zone).await.or_raise(|| ErrorKind::Source)?;

    let names = NameGenerator::new(
        config.templates.single.as_deref().unwrap_or(DEFAULT_TEMPLATE_SINGLE),
        config.templates.multiple.as_deref().unwrap_or(DEFAULT_TEMPLATE_MULTIPLE),
    )
    .or_raise(|| ErrorKind::Plan)?;
    let mapping = if config.map_each_entry { UrlMapping::PerEntry } else { UrlMapping::Legacy };
    let plan = UploadPlanner::new(names, mapping).plan(&catalog).or_raise(|| ErrorKind::Plan)?;

    write_summary(&config.output, &plan.summary).await?;

    let store = DestinationStore::new(destination, &config.folder).await.or_raise(|| ErrorKind::Destination)?;
    store.copy(&plan.manifest, config.count).await.or_raise(|| ErrorKind::Destination)
}

async fn write_summary(path: &Path, summary: &[SummaryEntry]) -> Result<()> {
    let json = serde_json::to_vec(summary).or_raise(|| ErrorKind::Output(path.to_path_buf()))?;
    tokio::fs::write(path, json).await.or_raise(|| ErrorKind::Output(path.to_path_buf()))?;
    tracing::info!(path = %path.display(), entries = summary.len(), "Wrote summary");
    Ok(())
}

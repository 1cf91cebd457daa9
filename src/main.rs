use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sparkify_etl::config::{AppConfig, CliConfig, FileConfig};
use sparkify_etl::{process_dataset, Dataset, RunSummary, SqliteWarehouse};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let resolved_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if resolved_path.is_absolute() {
        return Ok(resolved_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(resolved_path))
}

#[derive(Parser, Debug)]
#[command(name = "sparkify-etl")]
#[command(about = "Load song metadata and activity logs into a SQLite star schema")]
struct CliArgs {
    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite warehouse database file.
    #[clap(long, env = "SPARKIFY_DB_PATH", default_value = "sparkify.db", value_parser = parse_path)]
    pub db_path: PathBuf,

    /// Root directory of the song metadata files.
    #[clap(long, env = "SPARKIFY_SONG_DATA", default_value = "data/song_data", value_parser = parse_path)]
    pub song_data: PathBuf,

    /// Root directory of the activity log files.
    #[clap(long, env = "SPARKIFY_LOG_DATA", default_value = "data/log_data", value_parser = parse_path)]
    pub log_data: PathBuf,

    /// Drop and recreate all warehouse tables before loading.
    #[clap(long, env = "SPARKIFY_RESET")]
    pub reset: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            song_data: self.song_data.clone(),
            log_data: self.log_data.clone(),
            reset: self.reset,
        }
    }
}

fn log_summary(dataset: Dataset, summary: &RunSummary) {
    let totals = &summary.totals;
    info!(
        "{}: {}/{} files, {} records read, {} skipped",
        dataset.name(),
        summary.files_processed,
        summary.files_found,
        totals.records_read,
        totals.records_skipped
    );
    match dataset {
        Dataset::Songs => info!(
            "  artists inserted: {}, songs inserted: {}, duplicates ignored: {}",
            totals.artists_inserted, totals.songs_inserted, totals.conflicts_ignored
        ),
        Dataset::Logs => info!(
            "  time rows inserted: {}, users inserted: {}, songplays inserted: {} ({} without song), duplicates ignored: {}",
            totals.time_inserted,
            totals.users_inserted,
            totals.songplays_inserted,
            totals.unresolved_songplays,
            totals.conflicts_ignored
        ),
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Opening warehouse database at {:?}...", config.db_path);
    let mut warehouse = if config.reset {
        SqliteWarehouse::open_with_reset(&config.db_path)?
    } else {
        SqliteWarehouse::open(&config.db_path)?
    };

    let songs = process_dataset(&mut warehouse, &config.song_data, Dataset::Songs)?;
    let logs = process_dataset(&mut warehouse, &config.log_data, Dataset::Logs)?;

    info!("");
    info!("Load Summary");
    info!("============");
    log_summary(Dataset::Songs, &songs);
    log_summary(Dataset::Logs, &logs);

    let counts = warehouse.counts()?;
    info!(
        "Warehouse rows: {} artists, {} songs, {} users, {} time, {} songplays",
        counts.artists, counts.songs, counts.users, counts.time, counts.songplays
    );

    Ok(())
}

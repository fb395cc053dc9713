pub mod attachments;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod db;
pub mod models;
pub mod queries;
pub mod store;
pub mod validation;

use chrono::Local;
use serde::Serialize;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::db::SqliteKeyValueStore;
use crate::queries::DashboardSummary;
use crate::store::{ClinicStore, ConsistencyReport, StoreError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Cannot create data directory: {0}")]
    DataDir(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Output failed: {0}")]
    Output(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartupSummary<'a> {
    version: &'static str,
    dashboard: DashboardSummary<'a>,
    consistency: ConsistencyReport,
    month: Option<calendar::CalendarGrid<'a>>,
}

/// Open the clinic database under the data directory and print the
/// dashboard plus the current month grid as JSON.
pub fn run() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let data_dir = config::app_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let db_path = config::database_path();
    tracing::debug!(path = %db_path.display(), "Opening database");

    let backend = SqliteKeyValueStore::open(&db_path).map_err(StoreError::from)?;
    let store = ClinicStore::open(backend)?;

    let consistency = store.check_consistency();
    if !consistency.is_clean() {
        tracing::warn!(issues = consistency.issues.len(), "Consistency issues found");
    }

    let now = Local::now().naive_local();
    let summary = StartupSummary {
        version: config::APP_VERSION,
        dashboard: store.dashboard(now),
        consistency,
        month: calendar::month_grid(now.date(), store.appointments(), config::DEFAULT_WEEK_START),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

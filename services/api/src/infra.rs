use metrics_exporter_prometheus::PrometheusHandle;
use recruiting::config::{AppConfig, DatabaseConfig};
use recruiting::error::AppError;
use recruiting::pipeline::{RepositoryError, SqliteRecruitingRepository};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn open_repository(
    config: &DatabaseConfig,
) -> Result<SqliteRecruitingRepository, RepositoryError> {
    if config.is_in_memory() {
        SqliteRecruitingRepository::in_memory()
    } else {
        SqliteRecruitingRepository::open(&config.path)
    }
}

/// Load configuration, applying a `--database` override when given.
pub(crate) fn load_config(database: Option<String>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = database {
        config.database = DatabaseConfig::new(path)?;
    }
    Ok(config)
}

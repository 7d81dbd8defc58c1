use crate::models::config::Config;
use crate::repo::sqlite::Db;
use crate::service::launcher::{JobLauncher, ProcessLauncher};
use crate::service::progress::{FileProgressSource, ProgressSource};
use std::sync::Arc;

/// Shared application state, built once at startup and handed to Rocket.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,

    /// Where the progress endpoint reads from
    pub progress: Arc<dyn ProgressSource>,

    /// Starts the external backup job
    pub launcher: Arc<dyn JobLauncher>,
}

impl AppState {
    pub fn new(
        db: Db,
        progress: Arc<dyn ProgressSource>,
        launcher: Arc<dyn JobLauncher>,
    ) -> Self {
        Self {
            db,
            progress,
            launcher,
        }
    }

    /// Wires the file-backed progress source and the process launcher.
    pub fn from_config(db: Db, config: &Config) -> Self {
        Self::new(
            db,
            Arc::new(FileProgressSource::new(&config.progress_file)),
            Arc::new(ProcessLauncher::from_config(config)),
        )
    }
}

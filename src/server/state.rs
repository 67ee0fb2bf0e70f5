//! Server state and configuration.

use tokio::sync::Mutex;

use crate::config::StudioConfig;
use crate::error::PolaroidError;
use crate::export::{DirectoryTarget, ExportGateway};
use crate::session::Studio;
use crate::storage::JsonFileStore;

/// Application state shared across handlers.
pub struct AppState {
    pub studio: Mutex<Studio<JsonFileStore>>,
    pub exports: ExportGateway<DirectoryTarget>,
}

impl AppState {
    pub fn new(config: &StudioConfig) -> Result<Self, PolaroidError> {
        let studio = Studio::new(config.composer()?, config.store(), config.autosave_delay());
        Ok(Self {
            studio: Mutex::new(studio),
            exports: ExportGateway::new(DirectoryTarget::new(&config.export_dir)),
        })
    }
}

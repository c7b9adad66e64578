//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use hadir_core::{AttendanceManager, HadirConfig, Storage};
use tokio::sync::RwLock;

/// Shared, lock-guarded application state.
///
/// Attendance attempts take the write lock, which serializes concurrent
/// duplicate requests for the same user-day in front of the storage layer.
pub type SharedState = Arc<RwLock<AppState>>;

/// Application state behind [`SharedState`].
pub struct AppState {
    /// Current configuration (site, windows, classes, roster).
    pub config: HadirConfig,

    /// Where the configuration is persisted.
    pub config_path: PathBuf,

    /// The attendance session manager.
    pub manager: AttendanceManager,
}

impl AppState {
    /// Create application state from the platform default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or the data
    /// directory cannot be determined.
    pub fn new() -> anyhow::Result<Self> {
        let config_path = hadir_core::default_config_path();
        let config = HadirConfig::load_or_default(&config_path)?;
        let storage = Arc::new(Storage::default_location()?);
        Ok(Self {
            config,
            config_path,
            manager: AttendanceManager::new(storage),
        })
    }

    /// Create application state rooted at explicit paths (used by tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded.
    pub fn with_paths(config_path: PathBuf, data_dir: PathBuf) -> anyhow::Result<Self> {
        let config = HadirConfig::load_or_default(&config_path)?;
        let storage = Arc::new(Storage::new(data_dir));
        Ok(Self {
            config,
            config_path,
            manager: AttendanceManager::new(storage),
        })
    }

    /// Persist the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the file cannot be written.
    pub fn save_config(&self) -> hadir_core::Result<()> {
        self.config.save(&self.config_path)
    }

    /// Wrap this state for sharing across handlers.
    #[must_use]
    pub fn into_shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }
}

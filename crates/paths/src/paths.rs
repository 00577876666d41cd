//! Path context for runtime environment detection and care desk paths.

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Identifies the runtime environment where the application is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running via `cargo run` or in development mode
    Development,
    /// Running as an installed binary in production
    Production,
}

/// Directory name below the platform data dir in production.
const PRODUCT_DIR: &str = "CareDesk";

/// Context for managing application paths based on a facility/app structure.
#[derive(Debug, Clone)]
pub struct PathContext {
    /// The runtime environment (development or production)
    environment: RuntimeEnvironment,
    /// Base path for all application data
    base_path: Arc<Path>,
    /// Facility identifier (e.g., "sakura_home")
    facility: String,
    /// Application identifier (e.g., "care_desk")
    app_id: &'static str,
}

impl PathContext {
    /// Creates a new PathContext with automatic environment detection.
    pub fn new(facility: impl Into<String>, app_id: &'static str) -> Self {
        let environment = Self::detect_environment();
        let base_path = Self::determine_base_path(environment);

        Self {
            environment,
            base_path: base_path.into(),
            facility: facility.into(),
            app_id,
        }
    }

    /// Creates a PathContext with an explicit base path (useful for testing).
    pub fn with_base_path(
        base_path: PathBuf,
        facility: impl Into<String>,
        app_id: &'static str,
    ) -> Self {
        Self {
            environment: Self::detect_environment(),
            base_path: base_path.into(),
            facility: facility.into(),
            app_id,
        }
    }

    /// Detects the runtime environment based on executable location.
    fn detect_environment() -> RuntimeEnvironment {
        // Executables under a cargo "target" dir are development builds
        if let Ok(exe_path) = std::env::current_exe() {
            if exe_path.components().any(|c| c.as_os_str() == "target") {
                return RuntimeEnvironment::Development;
            }
        }

        if std::env::var("CARGO").is_ok() || std::env::var("CARGO_MANIFEST_DIR").is_ok() {
            return RuntimeEnvironment::Development;
        }

        RuntimeEnvironment::Production
    }

    /// Determines the base path based on the runtime environment.
    fn determine_base_path(environment: RuntimeEnvironment) -> PathBuf {
        match environment {
            RuntimeEnvironment::Development => std::env::var("CARGO_MANIFEST_DIR")
                .map(PathBuf::from)
                .or_else(|_| std::env::current_dir())
                .unwrap_or_else(|_| PathBuf::from(".")),
            // LocalAppData, Application Support or XDG_DATA_HOME
            RuntimeEnvironment::Production => dirs::data_local_dir()
                .map(|dir| dir.join(PRODUCT_DIR))
                .unwrap_or_else(|| PathBuf::from(".").join(".data")),
        }
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.environment
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn facility(&self) -> &str {
        &self.facility
    }

    pub fn app_id(&self) -> &str {
        self.app_id
    }

    /// Returns the facility root path: `<base>/<facility>`
    pub fn facility_root(&self) -> PathBuf {
        self.base_path.join(&self.facility)
    }

    /// Returns the config directory path: `<facility>/config/`
    pub fn config_dir(&self) -> PathBuf {
        self.facility_root().join("config")
    }

    /// Returns a config file path: `<facility>/config/<app_id>.<extension>`
    pub fn config_file(&self, extension: &str) -> PathBuf {
        self.config_dir()
            .join(format!("{}.{}", self.app_id, extension))
    }

    /// Returns the data directory path: `<facility>/data/`
    pub fn data_dir(&self) -> PathBuf {
        self.facility_root().join("data")
    }

    /// Returns the logs directory path: `<facility>/logs/`
    pub fn logs_dir(&self) -> PathBuf {
        self.facility_root().join("logs")
    }

    /// Returns a log file path with timestamp: `<facility>/logs/<app_id>.<timestamp>.log`
    pub fn log_file(&self, timestamp: &str) -> PathBuf {
        self.logs_dir()
            .join(format!("{}.{}.log", self.app_id, timestamp))
    }

    /// Returns a log file path with current timestamp.
    pub fn log_file_now(&self) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
        self.log_file(&timestamp)
    }

    /// Ensures all necessary directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        for dir in [self.config_dir(), self.data_dir(), self.logs_dir()] {
            if !dir.exists() {
                std::fs::create_dir_all(&dir)?;
            }
        }
        Ok(())
    }
}

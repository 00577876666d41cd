//! Layered desk configuration.
//!
//! Sources, later ones win:
//! 1. built-in defaults (`DeskConfig::default()`)
//! 2. `care_desk.json5` / `care_desk.toml` in the config directory
//! 3. an explicit `--config` file
//! 4. `CARE_DESK_*` environment variables, `__` between nested keys
//!    (`CARE_DESK_FORMS__SAVE_TIMEOUT_SECS=5`)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use care_forms::FormsConfig;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const ENV_PREFIX: &str = "CARE_DESK";

const CONFIG_FILES: [(&str, FileFormat); 2] = [
    ("care_desk.json5", FileFormat::Json5),
    ("care_desk.toml", FileFormat::Toml),
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file {0} does not exist")]
    MissingFile(PathBuf),

    #[error(transparent)]
    Load(#[from] config::ConfigError),
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub forms: FormsConfig,
    pub store: StoreConfig,
}

/// Behaviour of the in-memory record store.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Artificial delay of every save, in milliseconds.
    pub latency_ms: u64,
}

impl DeskConfig {
    /// Load from `config_dir`, an optional explicit file and the process environment.
    pub fn load(config_dir: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(config_dir, explicit, None)
    }

    /// Like `load`, with the environment given as a map (`None` reads the process env).
    pub fn load_with_env(
        config_dir: &Path,
        explicit: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&DeskConfig::default())?);

        for (name, format) in CONFIG_FILES {
            let path = config_dir.join(name);
            if path.exists() {
                debug!("reading config file {}", path.display());
            }
            builder = builder.add_source(File::from(path).format(format).required(false));
        }

        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            info!("using config file {}", path.display());
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        Ok(builder.build()?.try_deserialize()?)
    }
}

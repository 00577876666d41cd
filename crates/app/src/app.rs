use paths::PathContext;
use std::marker::PhantomData;
#[cfg(debug_assertions)]
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Contains path management, version info and the logging guard.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const FACILITY: &'static str = "default_facility";
}

/// Builder for creating applications with proper initialization.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new application builder.
    ///
    /// This performs all the common initialization:
    /// - Sets up path context (platform-specific directories)
    /// - Ensures all directories exist
    /// - Initializes logging (file + console)
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        #[cfg(debug_assertions)]
        let path_context = PathContext::with_base_path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join(".out"),
            A::FACILITY,
            A::APP_ID,
        );
        #[cfg(not(debug_assertions))]
        let path_context = PathContext::new(A::FACILITY, A::APP_ID);

        Self::with_paths(path_context, version)
    }

    /// Like `new`, with an explicit path context (tests, `--data-dir`).
    pub fn with_paths(path_context: PathContext, version: &'static str) -> Result<Self, BoxError> {
        path_context.ensure_directories()?;

        let log_file_path = path_context.log_file_now();
        let log_dir = log_file_path
            .parent()
            .ok_or("log file path has no parent directory")?;
        let log_filename = log_file_path
            .file_name()
            .ok_or("log file path has no file name")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        #[cfg(debug_assertions)]
        let level = LevelFilter::INFO;

        #[cfg(not(debug_assertions))]
        let level = LevelFilter::WARN;

        // RUST_LOG wins over the build default
        let filter = || {
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy()
        };

        // Separate layer: file (non-blocking) + console (stderr)
        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(filter());

        let console_layer = fmt::Layer::default()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter());

        // A global subscriber may already be set (e.g. several builders in one test binary)
        let _ = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .with(tracing_error::ErrorLayer::default())
            .try_init();

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    pub fn build(self) -> AppContext {
        self.context
    }
}

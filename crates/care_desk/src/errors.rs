//! Process wide error reporting for the desk binary.
//!
//! `color-eyre` renders `main`'s error reports. Panics go to the log file
//! first (without ANSI colours), then to the terminal: `better-panic` in
//! debug builds, a `human-panic` crash dump in release builds.

use std::panic::PanicHookInfo;
use std::sync::OnceLock;

use color_eyre::Result;
use color_eyre::config::{HookBuilder, PanicHook};
use tracing::error;

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Install the report and panic hooks. Later calls are no-ops.
pub fn init() -> Result<()> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = HookBuilder::default()
        .panic_section(concat!(
            "care_desk ",
            env!("CARGO_PKG_VERSION"),
            " crashed. Please send the log file to the system administrator."
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;
    install_panic_hook(panic_hook);

    let _ = INSTALLED.set(());
    Ok(())
}

fn install_panic_hook(panic_hook: PanicHook) {
    std::panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
        let report = panic_hook.panic_report(info).to_string();
        let location = info.location().map(ToString::to_string).unwrap_or_default();
        error!(%location, "panic: {}", strip_ansi_escapes::strip_str(&report));
        print_panic(info, &report);
        std::process::exit(libc::EXIT_FAILURE);
    }));
}

#[cfg(debug_assertions)]
fn print_panic(info: &PanicHookInfo<'_>, _report: &str) {
    better_panic::Settings::auto()
        .most_recent_first(false)
        .lineno_suffix(true)
        .verbosity(better_panic::Verbosity::Full)
        .create_panic_handler()(info);
}

#[cfg(not(debug_assertions))]
fn print_panic(info: &PanicHookInfo<'_>, report: &str) {
    use human_panic::{handle_dump, metadata, print_msg};

    let metadata = metadata!();
    let dump = handle_dump(&metadata, info);
    if let Err(err) = print_msg(dump, &metadata) {
        eprintln!("could not print the crash report: {err}");
    }
    eprintln!("{report}");
}

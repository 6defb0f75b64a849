use std::{path::Path, sync::LazyLock};

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub const LOG_PREFIX: &str = "goalstep";
const MAX_LOG_FILES: usize = 5;
const DEFAULT_LEVEL: &str = "info";

fn crate_target() -> String {
    env!("CARGO_PKG_NAME").replace('-', "_")
}

/// Filter for the crate's own events. `verbose` wins over `RUST_LOG`. A bare level in `RUST_LOG`
/// is scoped to the crate, a full directive is used as given.
pub fn filter_directive(verbose: bool, rust_log: Option<&str>) -> String {
    let target = crate_target();
    if verbose {
        return format!("{target}=trace");
    }
    match rust_log.map(str::trim).filter(|v| !v.is_empty()) {
        Some(directive) if directive.contains('=') => directive.to_owned(),
        Some(level) => format!("{target}={level}"),
        None => format!("{target}={DEFAULT_LEVEL}"),
    }
}

/// Every run appends to a daily log file in `<state_dir>/logs`. With `verbose` the same events
/// are also printed to stderr, so command output on stdout stays clean.
pub fn enable_logging(state_dir: &Path, verbose: bool) -> Result<()> {
    let appender = tracing_appender::rolling::Builder::new()
        .rotation(Rotation::DAILY)
        .max_log_files(MAX_LOG_FILES)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(state_dir.join("logs"))?;

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::new(filter_directive(verbose, rust_log.as_deref()));

    let file_layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false);

    let console_layer = verbose.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .compact()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;
    Ok(())
}

pub static TEST_LOGGING: LazyLock<()> = LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});

#[cfg(test)]
mod tests {
    use super::filter_directive;

    #[test]
    fn test_verbose_overrides_env() {
        assert_eq!(filter_directive(true, Some("warn")), "goalstep=trace");
    }

    #[test]
    fn test_bare_level_is_scoped_to_crate() {
        assert_eq!(filter_directive(false, Some("debug")), "goalstep=debug");
    }

    #[test]
    fn test_full_directive_is_kept() {
        assert_eq!(
            filter_directive(false, Some("goalstep=warn,tokio=info")),
            "goalstep=warn,tokio=info"
        );
    }

    #[test]
    fn test_default_level() {
        assert_eq!(filter_directive(false, None), "goalstep=info");
        assert_eq!(filter_directive(false, Some("  ")), "goalstep=info");
    }
}

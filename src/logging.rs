use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Level {
    /// Show only user-facing messages and errors.
    #[default]
    Default,
    /// Also show debug messages, including every git operation.
    Verbose,
}

/// Configure `tracing` for the given [`Level`]. `RUST_LOG` overrides the default filters.
pub(crate) fn setup_logging(level: Level) {
    let filter = match level {
        Level::Default => EnvFilter::builder()
            .with_default_directive(LevelFilter::OFF.into())
            .from_env_lossy(),
        Level::Verbose => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("git_vertag=debug"))
            .unwrap_or_else(|_| EnvFilter::new("debug")),
    };

    // stdout is reserved for tag names
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_target(level == Level::Verbose)
                .with_writer(std::io::stderr),
        )
        .init();
}

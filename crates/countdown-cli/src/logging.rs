use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `COUNTDOWN_LOG` wins over the configured
/// filter.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_env("COUNTDOWN_LOG")
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

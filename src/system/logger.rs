use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Level used when neither `TIMESLIDER_LOG` nor `RUST_LOG` is set.
const fn default_level(verbose: bool, interactive: bool) -> &'static str {
    match (verbose, interactive) {
        (true, _) => "debug",
        (false, true) => "error",
        (false, false) => "info",
    }
}

/// Installs the global subscriber writing to stderr. The terminal panel owns
/// stdout, and headless mode prints its change stream there.
pub fn init_logging(verbose: bool, no_color: bool, interactive: bool) {
    let fallback = default_level(verbose, interactive);
    let filter = std::env::var("TIMESLIDER_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(fallback),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new(fallback)),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

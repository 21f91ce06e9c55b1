use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `MATH_NOTES_DEBUG` decides the level: `info`
/// normally, `debug` (or whatever `RUST_LOG` asks for) when it is on.
pub fn init(debug: bool) {
    let filter = match debug {
        true => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        // RUST_LOG only counts in debug mode
        false => EnvFilter::new("info"),
    };

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

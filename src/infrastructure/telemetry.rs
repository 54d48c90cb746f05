use tracing_subscriber::EnvFilter;

/// Installs the global subscriber: `RUST_LOG` filtering (default `info`),
/// JSON lines in production and the human format elsewhere.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let result = if json {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {e}");
    }
}

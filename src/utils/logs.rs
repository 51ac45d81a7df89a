use tracing_subscriber::EnvFilter;

// installs the process-wide subscriber; RUST_LOG overrides the INFO default
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // log lines are shipped as plain JSON, so no ANSI color codes.
        .with_ansi(false)
        .json()
        .try_init();
}

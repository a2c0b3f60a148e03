use tracing_subscriber::EnvFilter;

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "leftovers=debug"
    } else {
        "leftovers=info"
    }
}

/// Installs the global subscriber. Logs go to stderr so stdout carries only
/// rendered output; `RUST_LOG` takes precedence over `verbose`.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
}

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Diagnostics go to stderr so command output stays clean. `RUST_LOG`
/// wins over both defaults.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "info,blog_client=debug,blog_cli=debug"
    } else {
        "warn"
    };

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_line_number(verbose),
        )
        .init();
}

use std::panic;

use tracing::Span;
use tracing_subscriber::EnvFilter;

/// Installs the process-wide subscriber. `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
    set_panic_hook();
}

/// Span every command execution is recorded under.
pub fn runner_span(working_dir: &std::path::Path) -> Span {
    tracing::info_span!("runner", workdir = %working_dir.display())
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}

#[cfg(test)]
pub use captured::CapturedLogs;

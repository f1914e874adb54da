use std::{env, sync::Once};

use tracing_subscriber::EnvFilter;

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVES: &str = "budget_ledger=info";

/// Initializes the global tracing subscriber, writing to stderr so stdout stays parseable.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = filter_from(env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// `RUST_LOG`-style directives replace the default entirely; blank or invalid input keeps it.
fn filter_from(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn explicit_directives_override_default_level() {
        let filter = filter_from(Some("budget_ledger=debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn missing_or_blank_directives_use_default() {
        assert_eq!(filter_from(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(filter_from(Some("  ")).max_level_hint(), Some(LevelFilter::INFO));
    }
}

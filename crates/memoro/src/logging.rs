//! Process-wide log initialization for embedding applications.

use tracing_subscriber::EnvFilter;

/// Default log filter: core crates at info, everything else at warn.
const DEFAULT_FILTER: &str = "memoro=info,memoro_store=info,memoro_query=info,\
                              memoro_backup=info,memoro_llm=info,memoro_accounts=info,warn";

/// Install a console subscriber.
///
/// The filter can be overridden with the `MEMORO_LOG` environment
/// variable. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let filter =
        EnvFilter::try_from_env("MEMORO_LOG").unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

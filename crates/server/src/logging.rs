//! Log subscriber setup.

use cinema_core::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber for `env`.
///
/// `local` logs human-readable lines, `dev` and `prod` log JSON. `RUST_LOG`
/// takes precedence over the environment's default level.
pub fn init(env: Environment) {
    let level = env.default_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("{},tower_http={}", level, level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if env.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

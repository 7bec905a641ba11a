// SPDX-License-Identifier: GPL-3.0-only

use tracing_subscriber::{EnvFilter, fmt};

/// Install a stderr fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directives` (e.g. `"diskinfo=info,warn"`).
///
/// Does nothing if a global subscriber is already installed.
pub fn init(default_directives: &str) {
    let installed = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    if installed.is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
}

//! Log setup for the preview tool.

use std::io::Write;

/// Installs `env_logger`, defaulting to `info` unless `RUST_LOG` says otherwise.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

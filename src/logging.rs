//! `env_logger` setup for the command-line tool.
//!
//! Logs go to stderr so stdout only carries the hash or the verdict. The level
//! is read from `SCRYPT_KDF_LOG` (e.g. `SCRYPT_KDF_LOG=debug`), default `warn`.

use std::sync::Once;

use env_logger::Env;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SCRYPT_KDF_LOG";

static INIT_LOGGER: Once = Once::new();

/// Initializes the logger once; later calls are no-ops.
pub fn init() {
    INIT_LOGGER.call_once(|| {
        env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV, "warn"))
            .format_timestamp(None)
            .target(env_logger::Target::Stderr)
            .init();
    });
}

/// Initializes logging for tests, tolerating an already installed logger.
pub fn init_test() {
    let _ = env_logger::Builder::from_env(Env::default().filter_or(LOG_ENV, "debug"))
        .is_test(true)
        .try_init();
}

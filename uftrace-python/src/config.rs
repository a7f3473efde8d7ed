//! Configuration read from the environment
//!
//! The extension has no arguments of its own; the tracer passes everything
//! through environment variables of the traced process.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use uftrace_python_common::{
    DEFAULT_DATA_DIR, ENV_DATA_DIR, ENV_SESSION_MARKER, TRACER_LIBRARY_PREFIX,
};

/// Log filter for this extension (`env_logger` syntax), default `warn`
pub const ENV_LOG_FILTER: &str = "UFTRACE_PYTHON_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceConfig {
    /// Running under a tracer session (`UFTRACE_SHMEM` present)
    pub session_active: bool,
    /// Where `python.sym` is appended (`UFTRACE_DIR`, default `uftrace.data`)
    pub data_dir: PathBuf,
    /// Basename prefix of the tracer library in the memory map
    pub module_prefix: String,
}

impl TraceConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|k| env::var_os(k))
    }

    /// Build from any key → value source
    ///
    /// Values are kept as raw bytes, `UFTRACE_DIR` must name the same
    /// directory the tracer writes to.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        Self {
            session_active: lookup(ENV_SESSION_MARKER).is_some(),
            data_dir: lookup(ENV_DATA_DIR).map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            module_prefix: TRACER_LIBRARY_PREFIX.to_string(),
        }
    }
}

/// Initialise `env_logger` once per process
///
/// Uses `try_init` since the embedding application may already own a logger.
pub fn init_logging() {
    let env = env_logger::Env::new().filter_or(ENV_LOG_FILTER, DEFAULT_LOG_FILTER);
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

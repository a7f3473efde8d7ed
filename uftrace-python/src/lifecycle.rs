//! Process start and exit hooks
//!
//! - **Start** (module import): if a tracer session is active, find the
//!   native hooks once and cache them in the bridge. Register the exit
//!   handler either way.
//! - **Exit** (`atexit`): drain the bridge's symbols into `python.sym`.

#![allow(unsafe_code)] // atexit registration

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Once;

use crate::bridge::EventBridge;
use crate::config::TraceConfig;
use crate::discovery::{find_self_module, scan_module, HookNames, HookSink, NativeHooks};
use crate::domain::DiscoveryError;

/// The bridge every trace callback goes through
pub static BRIDGE: EventBridge<NativeHooks> = EventBridge::new();

static EXIT_HANDLER: Once = Once::new();

/// Activate tracing and arrange for the symbol table to be written at exit
pub fn init() {
    activate(&TraceConfig::from_env(), &BRIDGE);
    register_exit_handler();
}

/// Resolve and install the native hooks if a tracer session is active
///
/// Returns whether hooks were installed. Failure is logged, never raised:
/// an inactive bridge keeps naming functions but calls nothing.
pub fn activate(config: &TraceConfig, bridge: &EventBridge<NativeHooks>) -> bool {
    if !config.session_active {
        debug!("Not in a tracing session, python hooks stay inactive");
        return false;
    }

    match discover_hooks(&config.module_prefix) {
        Ok(hooks) => {
            info!("Resolved tracer hooks: {hooks:?}");
            bridge.install_hooks(hooks)
        }
        Err(e) => {
            warn!("Python functions will not be traced: {e:#}");
            false
        }
    }
}

/// Find the tracer library in our address space and resolve both hooks
///
/// # Errors
/// Returns an error if the library isn't mapped, can't be scanned, or lacks
/// either hook symbol
pub fn discover_hooks(module_prefix: &str) -> Result<NativeHooks> {
    let module = find_self_module(module_prefix)?;

    let addrs = scan_module(&module.path, module.load_base, &HookNames::default())
        .context("Failed to scan tracer library for hooks")?;

    // SAFETY: both symbols come from the mapped tracer library, which is
    // never unloaded, and are defined with the HookFn ABI
    let hooks = unsafe { NativeHooks::from_addrs(addrs) };

    hooks.ok_or_else(|| {
        anyhow::Error::from(DiscoveryError::HooksMissing {
            path: module.path.clone(),
            enter_found: addrs.enter.is_some(),
            exit_found: addrs.exit.is_some(),
        })
    })
}

/// Write the bridge's symbols to `<data dir>/python.sym`
///
/// Runs regardless of activation; only the first call writes anything.
/// Returns the path written to.
pub fn finalize<H: HookSink>(config: &TraceConfig, bridge: &EventBridge<H>) -> Option<PathBuf> {
    let table = bridge.finalize()?;

    match table.append_to_dir(&config.data_dir) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("Writing symbol table of python program failed: {e}");
            None
        }
    }
}

/// Register [`finalize`] with `atexit`, once per process
pub fn register_exit_handler() {
    EXIT_HANDLER.call_once(|| {
        // SAFETY: `finalize_at_exit` is a plain extern "C" fn that never unwinds
        if unsafe { libc::atexit(finalize_at_exit) } != 0 {
            warn!("Failed to register exit handler, python symbols will not be saved");
        }
    });
}

extern "C" fn finalize_at_exit() {
    // Re-read: the directory is whatever the environment says at exit
    let _ = std::panic::catch_unwind(|| finalize(&TraceConfig::from_env(), &BRIDGE));
}

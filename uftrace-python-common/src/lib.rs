//! # Shared Contract (Python extension ↔ native tracer ↔ trace reader)
//!
//! Names, ABI and on-disk format constants that the Python extension shares
//! with two components it never links against:
//!
//! - the native tracer library (`libmcount*.so`), found at runtime through
//!   `/proc/self/maps`, whose hook entry points are called for every event
//! - the trace reader, which loads `<data dir>/python.sym` to translate the
//!   synthetic addresses back to function names
//!
//! Keep these in sync with the tracer side. Changing any of them silently
//! breaks the handshake since nothing is checked at build time.

#![no_std]

// ============================================================================
// Session Environment
// ============================================================================

/// Set by the tracer for every traced child process.
///
/// Presence-only check: any value means a tracing session is active.
pub const ENV_SESSION_MARKER: &str = "UFTRACE_SHMEM";

/// Overrides the directory the symbol table is written to
pub const ENV_DATA_DIR: &str = "UFTRACE_DIR";

/// Data directory used when [`ENV_DATA_DIR`] is unset
pub const DEFAULT_DATA_DIR: &str = "uftrace.data";

// ============================================================================
// Native Hook Discovery
// ============================================================================

/// Basename prefix of the native tracer library in the process memory map
pub const TRACER_LIBRARY_PREFIX: &str = "libmcount";

/// Function-enter hook exported by the tracer library
pub const HOOK_ENTER_SYMBOL: &str = "__cyg_profile_func_enter";

/// Function-exit hook exported by the tracer library
pub const HOOK_EXIT_SYMBOL: &str = "__cyg_profile_func_exit";

/// Calling convention of both hooks: `(child, parent)`.
///
/// The extension passes the synthetic address as `child` on enter and
/// zeros everywhere else.
pub type HookFn = unsafe extern "C" fn(child: core::ffi::c_ulong, parent: core::ffi::c_ulong);

// ============================================================================
// Symbol File Format
// ============================================================================

/// Stem of the symbol file: `<data dir>/python.sym`
pub const SYMBOL_FILE_STEM: &str = "python";

/// Extension of the symbol file
pub const SYMBOL_FILE_EXT: &str = "sym";

/// Symbol type written for every entry (`nm`-style text symbol)
pub const SYMBOL_TYPE_TEXT: char = 't';

/// Name of the sentinel line closing every table
pub const SYMBOL_END_MARKER: &str = "__sym_end";

/// First synthetic address handed out. Zero is reserved for "unknown".
pub const FIRST_SYMBOL_ADDR: u32 = 1;

// ============================================================================
// Host Runtime Conventions
// ============================================================================

/// `__name__` of the script the interpreter was started with
pub const ENTRY_MODULE_NAME: &str = "__main__";

/// `co_name` of a module's top-level code block
pub const MODULE_CODE_NAME: &str = "<module>";

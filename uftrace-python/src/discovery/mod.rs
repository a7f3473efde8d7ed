//! # Native Hook Discovery
//!
//! The Python extension and the tracer library (`libmcount*.so`) are loaded
//! independently: the tracer through `LD_PRELOAD`, the extension through
//! `import`. There is no link-time dependency between them, so the hook
//! entry points are found at runtime:
//!
//! ```text
//! 1. Read /proc/self/maps
//!    7f3a1d200000-7f3a1d20e000 r--p 00000000 08:01 2097210  /usr/lib/libmcount.so
//!    → first mapping whose basename starts with "libmcount"
//!    → path = /usr/lib/libmcount.so, load base = 0x7f3a1d200000
//!
//! 2. Parse the ELF file at that path, walk .symtab
//!    __cyg_profile_func_enter  st_value = 0x8a40
//!    __cyg_profile_func_exit   st_value = 0x8b10
//!
//! 3. Runtime address = load base + st_value
//!    enter = 0x7f3a1d208a40, exit = 0x7f3a1d208b10
//! ```
//!
//! Every failure along the way (maps unreadable, library not loaded, file
//! unreadable, stripped library, symbols absent) leaves the hooks
//! unresolved. That is the normal state when Python runs outside a tracing
//! session.
//!
//! ## Module Structure
//!
//! - **`memory_maps`**: `/proc/self/maps` parsing, library lookup by name prefix
//! - **`hook_scanner`**: ELF `.symtab` scan for the hook symbols
//! - **`hooks`**: found addresses, callable hook pair, the `HookSink` seam

pub mod hook_scanner;
pub mod hooks;
pub mod memory_maps;

pub use hook_scanner::{scan_module, HookNames};
pub use hooks::{HookAddrs, HookSink, NativeHooks};
pub use memory_maps::{find_self_module, MappedModule, Mapping};

//! End-to-end hook discovery against this test binary.
//!
//! The binary exports the two hook symbols itself, so the memory map scan
//! and the `.symtab` scan can be checked against real function pointers.

#![allow(unsafe_code)] // #[no_mangle] hook exports

use std::ffi::c_ulong;
use std::sync::Mutex;

use uftrace_python::bridge::{EventBridge, FrameView, TraceEvent};
use uftrace_python::discovery::{find_self_module, scan_module, HookNames, HookSink};
use uftrace_python::lifecycle::discover_hooks;

static EVENTS: Mutex<Vec<(char, u64, u64)>> = Mutex::new(Vec::new());

#[no_mangle]
pub extern "C" fn __cyg_profile_func_enter(child: c_ulong, parent: c_ulong) {
    EVENTS.lock().unwrap().push(('>', u64::from(child), u64::from(parent)));
}

#[no_mangle]
pub extern "C" fn __cyg_profile_func_exit(child: c_ulong, parent: c_ulong) {
    EVENTS.lock().unwrap().push(('<', u64::from(child), u64::from(parent)));
}

fn exe_name() -> String {
    let exe = std::env::current_exe().expect("Failed to get current exe");
    exe.file_name().expect("exe has a file name").to_string_lossy().to_string()
}

struct Frame(&'static str);

impl FrameView for Frame {
    fn code_name(&self) -> Option<String> {
        Some(self.0.to_string())
    }

    fn module_name(&self) -> Option<String> {
        Some("__main__".to_string())
    }
}

#[test]
fn test_scan_resolves_runtime_addresses() {
    let module = find_self_module(&exe_name()).expect("test binary is mapped");

    println!("Scanning {} at 0x{:x}", module.path.display(), module.load_base);

    let addrs = scan_module(&module.path, module.load_base, &HookNames::default())
        .expect("test binary has a symbol table");

    let enter = __cyg_profile_func_enter as extern "C" fn(c_ulong, c_ulong) as usize as u64;
    let exit = __cyg_profile_func_exit as extern "C" fn(c_ulong, c_ulong) as usize as u64;

    assert_eq!(addrs.enter, Some(enter));
    assert_eq!(addrs.exit, Some(exit));
}

#[test]
fn test_discovered_hooks_receive_trace() {
    let hooks = discover_hooks(&exe_name()).expect("hooks resolve in test binary");

    let bridge = EventBridge::new();
    assert!(bridge.install_hooks(hooks));

    // Only this test calls the hooks
    EVENTS.lock().unwrap().clear();

    bridge.handle(&Frame("a"), TraceEvent::Call);
    bridge.handle(&Frame("b"), TraceEvent::Call);
    bridge.handle(&Frame("b"), TraceEvent::from("line"));
    bridge.handle(&Frame("b"), TraceEvent::Return);
    bridge.handle(&Frame("a"), TraceEvent::Return);

    assert_eq!(
        *EVENTS.lock().unwrap(),
        vec![('>', 1, 0), ('>', 2, 0), ('<', 0, 0), ('<', 0, 0)]
    );

    let table = bridge.finalize().expect("first finalize");
    assert_eq!(table.len(), 2);
    assert_eq!(table.end_addr().0, 3);

    // The cached copy calls the same functions
    hooks.enter(uftrace_python::domain::SymbolAddr(9));
    assert_eq!(EVENTS.lock().unwrap().last(), Some(&('>', 9, 0)));
}

//! Qualified function names from interpreter frames

use uftrace_python_common::{ENTRY_MODULE_NAME, MODULE_CODE_NAME};

/// What the bridge needs to know about a frame.
///
/// Implemented for live CPython frames in the `python` module and for plain
/// structs in tests. Every accessor is fallible: a frame that can't answer
/// degrades the name rather than failing the event.
pub trait FrameView {
    /// `co_qualname` of the frame's code object, else `co_name`
    fn code_name(&self) -> Option<String>;

    /// `__name__` from the frame's globals
    fn module_name(&self) -> Option<String>;
}

/// Build the name a frame is recorded under
///
/// - `mymod` + `foo` → `mymod.foo`
/// - `__main__` + `foo` → `foo`
/// - `__main__` + `<module>` → `__main__.<module>`
/// - no module → `foo`
///
/// Returns `None` only when the code object has no readable name.
#[must_use]
pub fn qualified_name(frame: &impl FrameView) -> Option<String> {
    let name = frame.code_name()?;

    match frame.module_name() {
        Some(module) if module != ENTRY_MODULE_NAME || name == MODULE_CODE_NAME => {
            Some(format!("{module}.{name}"))
        }
        _ => Some(name),
    }
}

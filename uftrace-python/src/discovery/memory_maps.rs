//! Memory mapping utilities for locating the native tracer library
//!
//! The extension and the tracer library are loaded independently, so the
//! only way to find the tracer is to look at our own address space. This
//! module parses `/proc/self/maps` and reports where a library was mapped.

use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::DiscoveryError;

const SELF_MAPS: &str = "/proc/self/maps";

/// One line of `/proc/<pid>/maps`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub start: u64,
    pub end: u64,
    pub perms: String,
    /// Backing file, `None` for anonymous mappings
    pub path: Option<PathBuf>,
}

impl Mapping {
    /// Check if the backing file's basename starts with `prefix`
    #[must_use]
    pub fn file_name_starts_with(&self, prefix: &str) -> bool {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .is_some_and(|name| name.to_string_lossy().starts_with(prefix))
    }
}

/// A library found in the memory map: where it lives and where it was loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedModule {
    pub path: PathBuf,
    pub load_base: u64,
}

/// Parse a single maps line: "start-end perms offset dev inode [pathname]"
///
/// Returns `None` for lines that don't follow the format.
#[must_use]
pub fn parse_maps_line(line: &str) -> Option<Mapping> {
    let mut fields = line.splitn(6, char::is_whitespace);

    let (start, end) = fields.next()?.split_once('-')?;
    let start = u64::from_str_radix(start, 16).ok()?;
    let end = u64::from_str_radix(end, 16).ok()?;
    let perms = fields.next()?.to_string();

    // offset, dev and inode must be present even for anonymous mappings
    for _ in 0..3 {
        fields.next().filter(|f| !f.is_empty())?;
    }

    // The kernel pads the inode column with spaces before the path
    let path = fields.next().map(str::trim).filter(|p| !p.is_empty()).map(PathBuf::from);

    Some(Mapping { start, end, perms, path })
}

/// Find the first mapping whose file basename starts with `prefix`
///
/// Unparseable lines are skipped. The first matching mapping of a shared
/// library is the one at file offset 0, so its start is the load base.
#[must_use]
pub fn find_module_in_maps(maps: &str, prefix: &str) -> Option<MappedModule> {
    maps.lines()
        .filter_map(parse_maps_line)
        .find(|mapping| mapping.file_name_starts_with(prefix))
        .and_then(|mapping| {
            let path = mapping.path?;
            Some(MappedModule { path, load_base: mapping.start })
        })
}

/// Locate a library mapped into the current process
///
/// # Errors
/// Returns an error if `/proc/self/maps` cannot be read or no mapping
/// matches `prefix`. Both simply mean the hooks stay unresolved.
pub fn find_self_module(prefix: &str) -> Result<MappedModule, DiscoveryError> {
    let maps = fs::read_to_string(SELF_MAPS).map_err(DiscoveryError::MapsUnreadable)?;

    let module = find_module_in_maps(&maps, prefix)
        .ok_or_else(|| DiscoveryError::ModuleNotMapped { prefix: prefix.to_string() })?;

    debug!("Found {} mapped at 0x{:x}", module.path.display(), module.load_base);
    Ok(module)
}

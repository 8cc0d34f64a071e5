//! Machine hostname lookup.

use std::ffi::OsString;

/// Resolve the machine hostname from the operating system.
///
/// Returns `None` when the name is empty or not valid UTF-8.
pub fn resolve_hostname() -> Option<String> {
    usable(gethostname::gethostname())
}

fn usable(raw: OsString) -> Option<String> {
    let name = raw.into_string().ok()?;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

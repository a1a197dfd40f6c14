//! Conflict-resolving item names.
//!
//! Under the copy conflict policy a clashing name gets a ` - Copy` marker
//! appended, repeatedly, until a free name is found. For files the marker
//! goes in front of the first dot so the extension chain is preserved:
//! `archive.tar.gz` becomes `archive - Copy.tar.gz`.

/// Marker appended to resolve a name collision.
pub const COPY_SUFFIX: &str = " - Copy";

/// The next candidate name for a clashing folder.
pub fn folder_copy_name(name: &str) -> String {
    format!("{name}{COPY_SUFFIX}")
}

/// The next candidate name for a clashing file. The marker is inserted
/// before the first dot; a dotless name gets it appended.
pub fn file_copy_name(name: &str) -> String {
    match name.find('.') {
        Some(dot) => format!("{}{COPY_SUFFIX}{}", &name[..dot], &name[dot..]),
        None => format!("{name}{COPY_SUFFIX}"),
    }
}

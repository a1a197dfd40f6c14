//! Folder path and item name rules.
//!
//! Every folder path begins and ends with `/`. The root is the single-slash
//! path `/`. A child path is its parent's path plus the child name plus a
//! trailing slash, so prefix matching on paths matches whole subtrees.

use filenest_core::error::AppError;
use filenest_core::result::AppResult;

/// Validate a folder path. Paths must begin and end with `/`.
pub fn validate(path: &str) -> AppResult<()> {
    if path.starts_with('/') && path.ends_with('/') {
        Ok(())
    } else {
        Err(AppError::invalid_path(format!(
            "Folder path must begin and end with '/': '{path}'"
        )))
    }
}

/// Validate a folder or file name: non-empty and free of `/`.
pub fn validate_name(name: &str) -> AppResult<()> {
    if name.is_empty() {
        return Err(AppError::validation("Name must not be empty"));
    }
    if name.contains('/') {
        return Err(AppError::validation(format!(
            "Name must not contain '/': '{name}'"
        )));
    }
    Ok(())
}

/// Build a child folder path from its parent's path and its name.
pub fn join(parent_path: &str, name: &str) -> String {
    format!("{parent_path}{name}/")
}

/// Case-insensitive test of whether `path` lies under `prefix`.
///
/// Compares bytes so that `prefix.len()` landing inside a multi-byte
/// character in `path` is a mismatch, not a panic.
pub fn starts_with_ci(path: &str, prefix: &str) -> bool {
    path.len() >= prefix.len()
        && path.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Replace the leading `old` prefix of `path` with `new`, matching the
/// prefix case-insensitively. Returns the path unchanged if it does not
/// start with `old`.
pub fn replace_prefix_ci(path: &str, old: &str, new: &str) -> String {
    if starts_with_ci(path, old) {
        format!("{new}{}", &path[old.len()..])
    } else {
        path.to_string()
    }
}

//! Naming-conflict resolution policy.

use serde::{Deserialize, Serialize};

/// Caller-selected behavior when a create/move/copy target name is
/// already occupied by an active item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail the operation with an already-exists result.
    #[default]
    RaiseConflict,
    /// Rewrite the name with a `" - Copy"` suffix until it is free.
    Copy,
}

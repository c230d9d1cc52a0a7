//! Rendering a subtree as commands that recreate it.

use std::fmt;

use serde::Serialize;

/// One collection in an exported subtree.
///
/// Displays as the `purview collections put` invocation that recreates it
/// with the same id, label, and parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecreateStatement {
    /// Collection id.
    pub id: String,
    /// Display label.
    pub friendly_name: String,
    /// Parent collection id.
    pub parent_id: String,
}

impl fmt::Display for RecreateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "purview collections put --id {} --friendly-name \"{}\" --parent {}",
            self.id,
            self.friendly_name.replace('\\', "\\\\").replace('"', "\\\""),
            self.parent_id
        )
    }
}

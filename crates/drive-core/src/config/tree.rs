//! File-tree behavior settings.

use serde::{Deserialize, Serialize};

/// Limits and policies of the tree engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum number of parent links followed by an ancestor walk.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Reject a folder name already used by a live sibling folder.
    #[serde(default = "default_true")]
    pub unique_folder_names: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            unique_folder_names: default_true(),
        }
    }
}

fn default_max_depth() -> usize {
    256
}

fn default_true() -> bool {
    true
}

//! Per-owner storage usage summary.

use serde::{Deserialize, Serialize};

use super::model::Node;

/// Aggregate view of an owner's nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Total bytes of live files.
    pub used_bytes: i64,
    /// Configured quota in bytes.
    pub quota_bytes: i64,
    /// Number of live files.
    pub file_count: u64,
    /// Number of live folders.
    pub folder_count: u64,
    /// Number of trashed nodes of either kind.
    pub trashed_count: u64,
    /// Used share of the quota, capped at 100.
    pub percentage: f64,
}

impl StorageUsage {
    /// Summarize a set of nodes against a quota.
    pub fn from_nodes<'a>(nodes: impl IntoIterator<Item = &'a Node>, quota_bytes: i64) -> Self {
        let mut usage = Self {
            quota_bytes,
            ..Self::default()
        };
        for node in nodes {
            if node.trashed {
                usage.trashed_count += 1;
                continue;
            }
            if node.is_folder() {
                usage.folder_count += 1;
            } else {
                usage.file_count += 1;
                let size = node.size_bytes.unwrap_or(0).max(0);
                usage.used_bytes = usage.used_bytes.saturating_add(size);
            }
        }
        usage.percentage = if quota_bytes > 0 {
            (usage.used_bytes as f64 / quota_bytes as f64 * 100.0).min(100.0)
        } else {
            0.0
        };
        usage
    }
}

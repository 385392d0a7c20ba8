//! Per-item results of a run and their summary.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

use serde::Serialize;

/// What happened to one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Copied to its destination.
    Copied,
    /// Destination computed but not written (`--dry-run`).
    Planned,
    /// The format asked to skip this file.
    Skipped,
    /// Evaluation or copying failed.
    Failed,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 4] = [
        ItemStatus::Copied,
        ItemStatus::Planned,
        ItemStatus::Skipped,
        ItemStatus::Failed,
    ];
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ItemStatus::Copied => write!(f, "copied"),
            ItemStatus::Planned => write!(f, "planned"),
            ItemStatus::Skipped => write!(f, "skipped"),
            ItemStatus::Failed => write!(f, "failed"),
        }
    }
}

/// The result for one source file.
#[derive(Debug, Clone, Serialize)]
pub struct ItemReport {
    pub source: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
    pub status: ItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Results for a whole run.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    pub items: Vec<ItemReport>,
    /// True if the format called `<exit()>`.
    pub exited: bool,
}

impl RunReport {
    /// Number of items with `status`.
    pub fn count(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    /// Total bytes copied.
    pub fn bytes_written(&self) -> u64 {
        self.items.iter().filter_map(|i| i.bytes).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.count(ItemStatus::Failed) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: ItemStatus, bytes: Option<u64>) -> ItemReport {
        ItemReport {
            source: PathBuf::from("a.mp3"),
            destination: None,
            status,
            bytes,
            error: None,
        }
    }

    #[test]
    fn counts_and_bytes() {
        let report = RunReport {
            items: vec![
                item(ItemStatus::Copied, Some(10)),
                item(ItemStatus::Copied, Some(5)),
                item(ItemStatus::Skipped, None),
            ],
            exited: false,
        };
        assert_eq!(report.count(ItemStatus::Copied), 2);
        assert_eq!(report.count(ItemStatus::Failed), 0);
        assert_eq!(report.bytes_written(), 15);
        assert!(!report.has_failures());
    }

    #[test]
    fn serializes_without_empty_fields() {
        let json = serde_json::to_value(item(ItemStatus::Skipped, None)).unwrap();
        assert_eq!(json, serde_json::json!({ "source": "a.mp3", "status": "skipped" }));
    }
}

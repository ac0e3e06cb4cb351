//! Data models for bug references, attachment records, and run bookkeeping

use serde::{Deserialize, Serialize};

/// One feed entry: the bug-view URL that identifies a bug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugRef {
    pub url: String,
}

/// The bug list returned by the feed query, with the query URL kept for
/// provenance in warnings and the run summary.
#[derive(Debug, Clone)]
pub struct BugList {
    pub query_url: String,
    pub bugs: Vec<BugRef>,
}

/// One attachment row of the aggregate, fully normalized for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub id: String,
    pub file_name: String,
    pub extension: String,
    pub filepath: String,
    pub declared_mimetype: String,
    /// Sniffed from downloaded bytes; empty when downloads were off, the
    /// tracker sent no data, or the bytes matched no known signature.
    pub computed_mimetype: String,
    pub last_change_time: String,
}

/// A bug's attachments, in the order the tracker returned them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BugAttachments {
    pub bug_id: String,
    pub attachments: Vec<AttachmentRecord>,
}

/// Insertion-ordered bug-id → attachments mapping built during one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aggregate {
    pub bugs: Vec<BugAttachments>,
}

impl Aggregate {
    /// Insert a bug's attachments, replacing any prior entry for the same
    /// bug id in place so re-processing a bug never reorders the report.
    pub fn insert(&mut self, bug_id: &str, attachments: Vec<AttachmentRecord>) {
        if let Some(existing) = self.bugs.iter_mut().find(|b| b.bug_id == bug_id) {
            existing.attachments = attachments;
        } else {
            self.bugs.push(BugAttachments {
                bug_id: bug_id.to_string(),
                attachments,
            });
        }
    }

    #[must_use]
    pub fn get(&self, bug_id: &str) -> Option<&[AttachmentRecord]> {
        self.bugs
            .iter()
            .find(|b| b.bug_id == bug_id)
            .map(|b| b.attachments.as_slice())
    }

    #[must_use]
    pub fn bug_count(&self) -> usize {
        self.bugs.len()
    }

    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.bugs.iter().map(|b| b.attachments.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bugs.is_empty()
    }
}

/// Running totals across one collection pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunCounters {
    /// Attachments whose declared MIME type equals the target exactly.
    pub mimetype_matches: u64,
}

/// Represents a bug that was skipped after a recoverable failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedBug {
    pub url: String,
    pub code: String,
    pub message: String,
}

/// Snapshot handed to the progress notifier after each processed bug.
#[derive(Debug, Clone)]
pub struct BugProgress {
    pub index: usize,
    pub total: usize,
    pub bug_id: String,
    pub attachments: usize,
}

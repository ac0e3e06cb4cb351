//! Bug-Tracker Attachment MIME Audit Library
//!
//! This library drives one audit pass against a Bugzilla-style tracker:
//! list the bugs whose attachments declare a target MIME type, pull each
//! bug's attachment metadata over the tracker's RPC interface, optionally
//! download the bytes and sniff their real type, and render the collected
//! records as a self-contained HTML report.

pub mod cli;
pub mod io;
pub mod models;
pub mod services;

pub use models::{Aggregate, AttachmentRecord, BugProgress, RunCounters, SkippedBug};

use std::result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Custom error type for the library
#[derive(Debug)]
pub enum Error {
    Transport(String),
    Parse(String),
    Io(std::io::Error),
    InvalidInput(String),
    Cancelled,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Transport(msg) => write!(f, "Transport error: {msg}"),
            Error::Parse(msg) => write!(f, "Parse error: {msg}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::Cancelled => write!(f, "Interrupted"),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl Error {
    /// Short stable label used in skip records and summaries.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Error::Transport(_) => "transport",
            Error::Parse(_) => "parse",
            Error::Io(_) => "io",
            Error::InvalidInput(_) => "invalid-input",
            Error::Cancelled => "cancelled",
        }
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Cooperative cancellation flag, shared between the run loop and an
/// interrupt handler. Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Callback invoked after each bug is folded into the aggregate.
pub type ProgressNotifier = Arc<dyn Fn(&BugProgress) + Send + Sync>;

/// Options for one audit run
#[derive(Clone)]
pub struct RunOptions {
    pub base_url: String,
    pub product: String,
    pub mimetype: String,
    pub max_bugs: usize,
    pub download_attachments: bool,
    pub log_results: bool,
    pub html_report: bool,
    pub attachments_dir: String,
    pub report_path: String,
    pub results_log_path: String,
    pub cancel: CancelFlag,
    pub progress: Option<ProgressNotifier>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            base_url: "https://bugs.libreoffice.org".to_string(),
            product: "LibreOffice".to_string(),
            mimetype: "application/octet-stream".to_string(),
            max_bugs: 1000,
            download_attachments: false,
            log_results: false,
            html_report: true,
            attachments_dir: "attachments".to_string(),
            report_path: "mimetypestats.html".to_string(),
            results_log_path: "mimetypecount.csv".to_string(),
            cancel: CancelFlag::default(),
            progress: None,
        }
    }
}

impl RunOptions {
    /// Reject option combinations the pipeline cannot work with.
    ///
    /// The MIME filter must be a `type/subtype` string: the tracker-side
    /// equality filter and the match counter both compare it verbatim.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim_end_matches('/').is_empty() {
            return Err(Error::InvalidInput("base URL must not be empty".to_string()));
        }

        let well_formed = matches!(
            self.mimetype.split_once('/'),
            Some((t, s)) if !t.is_empty() && !s.is_empty()
        );
        if !well_formed {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a type/subtype MIME string",
                self.mimetype
            )));
        }

        if self.max_bugs == 0 {
            return Err(Error::InvalidInput(
                "maximum bug count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Summary result from an audit run
#[derive(Debug)]
pub struct RunSummary {
    pub query_url: String,
    pub mimetype: String,
    pub total_listed: usize,
    pub processed: usize,
    pub aggregate: Aggregate,
    pub counters: RunCounters,
    pub skipped: Vec<SkippedBug>,
    pub report_path: Option<String>,
}

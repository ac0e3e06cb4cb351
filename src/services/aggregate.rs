//! Per-bug attachment collection and normalization
//!
//! This is the middle of the pipeline: consume bug references up to the
//! configured cap, query each bug's attachments, normalize them into
//! [`AttachmentRecord`]s, and fold the results into the run's [`Aggregate`].
//! A failing bug is recorded and skipped; only cancellation (or a local
//! I/O failure outside the per-attachment path) aborts the pass.

use crate::io::store;
use crate::models::{Aggregate, AttachmentRecord, BugProgress, BugRef, RunCounters, SkippedBug};
use crate::services::rpc::{AttachmentQuery, RawAttachment};
use crate::services::sniff;
use crate::{Error, Result, RunOptions};
use chrono::{DateTime, NaiveDateTime};

/// Everything one collection pass produced.
#[derive(Debug)]
pub struct CollectOutcome {
    pub aggregate: Aggregate,
    pub counters: RunCounters,
    pub skipped: Vec<SkippedBug>,
    /// Bugs whose attachments made it into the aggregate.
    pub processed: usize,
}

/// Extract the bug id from a bug-view URL.
///
/// Feed entries identify bugs as `{base}/show_bug.cgi?id=12345`; the id is
/// the text after the last `=`. This leans on the tracker keeping that URL
/// shape and breaks loudly (as a per-bug parse failure) if it changes.
pub fn bug_id_from_url(url: &str) -> Result<String> {
    let Some((_, id)) = url.rsplit_once('=') else {
        return Err(Error::Parse(format!("bug URL has no id parameter: {url}")));
    };

    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Parse(format!(
            "bug URL does not end in a numeric id: {url}"
        )));
    }

    Ok(id.to_string())
}

/// File extension of `file_name`: the text after the last `.`, without the
/// dot. Empty when there is no dot.
#[must_use]
pub fn extension_of(file_name: &str) -> &str {
    file_name.rsplit_once('.').map_or("", |(_, ext)| ext)
}

/// Deterministic local path for an attachment's bytes. Distinct
/// `(attachment_id, bug_id)` pairs always yield distinct paths because both
/// ids are plain integers and `_` cannot occur inside either. Path
/// separators in the tracker-supplied `file_name` are flattened to `_`, so
/// the result always stays inside `dir`.
#[must_use]
pub fn attachment_filepath(dir: &str, attachment_id: &str, bug_id: &str, file_name: &str) -> String {
    let file_name = file_name.replace(['/', '\\'], "_");
    format!("{dir}/{attachment_id}_{bug_id}_{file_name}")
}

/// Normalize the tracker's `last_change_time` to `YYYY-MM-DD HH:MM`.
///
/// Accepts RFC 3339 and the tracker's compact `YYYYMMDDTHH:MM:SS` form.
/// Anything else passes through verbatim so the report still shows what
/// the tracker sent.
#[must_use]
pub fn normalize_change_time(raw: &str) -> String {
    const DISPLAY: &str = "%Y-%m-%d %H:%M";

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format(DISPLAY).to_string();
    }
    for pattern in ["%Y%m%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, pattern) {
            return ts.format(DISPLAY).to_string();
        }
    }

    log::debug!("unrecognized last_change_time format: {raw}");
    raw.to_string()
}

/// Collect attachments for `bugs`, at most `opts.max_bugs` of them.
///
/// Transport and parse failures skip the offending bug and the pass
/// continues; cancellation and anything outside those two kinds abort it.
pub fn collect_attachments<Q: AttachmentQuery + ?Sized>(
    query: &Q,
    bugs: &[BugRef],
    opts: &RunOptions,
) -> Result<CollectOutcome> {
    let mut aggregate = Aggregate::default();
    let mut counters = RunCounters::default();
    let mut skipped = Vec::new();
    let mut processed = 0;

    let total = bugs.len().min(opts.max_bugs);

    for (index, bug) in bugs.iter().take(opts.max_bugs).enumerate() {
        if opts.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let (bug_id, records) = match process_bug(query, bug, opts, &mut counters) {
            Ok(pair) => pair,
            Err(err @ (Error::Transport(_) | Error::Parse(_))) => {
                log::warn!("skipping bug {}: {err}", bug.url);
                skipped.push(SkippedBug {
                    url: bug.url.clone(),
                    code: err.code().to_string(),
                    message: err.to_string(),
                });
                continue;
            }
            Err(other) => return Err(other),
        };

        if let Some(notify) = &opts.progress {
            notify(&BugProgress {
                index: index + 1,
                total,
                bug_id: bug_id.clone(),
                attachments: records.len(),
            });
        }

        aggregate.insert(&bug_id, records);
        processed += 1;
    }

    Ok(CollectOutcome {
        aggregate,
        counters,
        skipped,
        processed,
    })
}

fn process_bug<Q: AttachmentQuery + ?Sized>(
    query: &Q,
    bug: &BugRef,
    opts: &RunOptions,
    counters: &mut RunCounters,
) -> Result<(String, Vec<AttachmentRecord>)> {
    let bug_id = bug_id_from_url(&bug.url)?;
    log::debug!("querying attachments for bug {bug_id}");

    let raw = query.attachments(&bug_id, opts.download_attachments)?;

    let mut records = Vec::with_capacity(raw.len());
    for attachment in raw {
        records.push(build_record(attachment, &bug_id, opts, counters));
    }

    Ok((bug_id, records))
}

/// Turn one raw attachment into its report record, persisting and sniffing
/// the bytes when downloads are enabled. Download-side failures never fail
/// the record; it is produced with whatever MIME fields are available.
fn build_record(
    raw: RawAttachment,
    bug_id: &str,
    opts: &RunOptions,
    counters: &mut RunCounters,
) -> AttachmentRecord {
    let id = raw.id.to_string();
    let filepath = attachment_filepath(&opts.attachments_dir, &id, bug_id, &raw.file_name);
    let mut computed_mimetype = String::new();

    if opts.download_attachments {
        match raw.decode_data() {
            Ok(Some(bytes)) => {
                log::debug!("writing attachment {id} to {filepath}");
                if let Err(e) = store::write_attachment(&filepath, &bytes) {
                    log::warn!("could not write attachment {id} to {filepath}: {e}");
                }
                if let Some(mime) = sniff::detect_mime(&bytes) {
                    computed_mimetype = mime;
                }
            }
            Ok(None) => log::debug!("attachment {id} came back without data"),
            Err(e) => log::warn!("{e}"),
        }
    }

    // Exact string equality on purpose: a case or parameter difference is a
    // tracker-side labeling problem this tool exists to surface.
    if raw.content_type == opts.mimetype {
        counters.mimetype_matches += 1;
    }

    AttachmentRecord {
        extension: extension_of(&raw.file_name).to_string(),
        filepath,
        declared_mimetype: raw.content_type,
        computed_mimetype,
        last_change_time: normalize_change_time(&raw.last_change_time),
        file_name: raw.file_name,
        id,
    }
}

//! HTML report rendering and the single-shot report write
//!
//! The whole document is assembled in memory and committed with one write;
//! rendering is a pure function of the aggregate and the run options, so an
//! identical aggregate always produces identical bytes.

use crate::models::{Aggregate, AttachmentRecord, BugAttachments};
use crate::{Result, RunOptions};
use std::fs;

/// Report columns as `(key, header label)`, in render order. The column
/// set is fixed; nothing is inferred from the data.
pub const REPORT_COLUMNS: [(&str, &str); 9] = [
    ("bug_id", "Bug"),
    ("attachment_id", "Attachment"),
    ("attachment_edit", "Edit"),
    ("file_name", "Filename"),
    ("extension", "Extension"),
    ("filepath", "Filepath"),
    ("declared_mimetype", "Declared MimeType"),
    ("computed_mimetype", "Computed MimeType"),
    ("last_change_time", "Last Changed"),
];

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Style class for a MIME cell: `match` iff declared equals computed as
/// exact strings. Case differences and an empty computed value are
/// mismatches; that is the point of the report.
#[must_use]
pub fn mime_class(declared: &str, computed: &str) -> &'static str {
    if declared == computed { "match" } else { "no-match" }
}

fn is_mime_column(key: &str) -> bool {
    key.contains("mimetype")
}

fn record_field<'a>(record: &'a AttachmentRecord, key: &str) -> &'a str {
    match key {
        "file_name" => &record.file_name,
        "extension" => &record.extension,
        "filepath" => &record.filepath,
        "declared_mimetype" => &record.declared_mimetype,
        "computed_mimetype" => &record.computed_mimetype,
        "last_change_time" => &record.last_change_time,
        _ => "",
    }
}

/// Render the complete report document for `aggregate`.
#[must_use]
pub fn render_report(aggregate: &Aggregate, opts: &RunOptions) -> String {
    let base = escape_html(opts.base_url.trim_end_matches('/'));

    let mut html = String::with_capacity(4096 + 512 * aggregate.attachment_count());
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Attachment MIME type report</title>\n");
    html.push_str("<style>\n");
    html.push_str("table { border-collapse: collapse; }\n");
    html.push_str("th, td { border: 1px solid #999; padding: 2px 8px; }\n");
    html.push_str("td.match { background-color: #cfc; }\n");
    html.push_str("td.no-match { background-color: #fcc; }\n");
    html.push_str("</style>\n</head>\n<body>\n");
    html.push_str(&format!(
        "<h1><a href=\"{base}\">{}</a> attachments declaring {}</h1>\n",
        escape_html(&opts.product),
        escape_html(&opts.mimetype)
    ));

    html.push_str("<table>\n<tr>");
    for (_, label) in REPORT_COLUMNS {
        html.push_str(&format!("<th>{}</th>", escape_html(label)));
    }
    html.push_str("</tr>\n");

    for bug in &aggregate.bugs {
        push_bug_row(&mut html, bug, &base);
        for record in &bug.attachments {
            push_attachment_row(&mut html, record, &base);
        }
    }

    html.push_str("</table>\n</body>\n</html>\n");
    html
}

/// One row per bug: the bug cell links back to the tracker, every other
/// cell stays empty so attachment rows line up underneath.
fn push_bug_row(html: &mut String, bug: &BugAttachments, base: &str) {
    let id = escape_html(&bug.bug_id);
    html.push_str("<tr>");
    for (key, _) in REPORT_COLUMNS {
        if key == "bug_id" {
            html.push_str(&format!(
                "<td><a href=\"{base}/show_bug.cgi?id={id}\">{id}</a></td>"
            ));
        } else {
            html.push_str("<td></td>");
        }
    }
    html.push_str("</tr>\n");
}

fn push_attachment_row(html: &mut String, record: &AttachmentRecord, base: &str) {
    let id = escape_html(&record.id);
    html.push_str("<tr>");
    for (key, _) in REPORT_COLUMNS {
        match key {
            "bug_id" => html.push_str("<td></td>"),
            "attachment_id" => html.push_str(&format!(
                "<td><a href=\"{base}/attachment.cgi?id={id}\">{id}</a></td>"
            )),
            "attachment_edit" => html.push_str(&format!(
                "<td><a href=\"{base}/attachment.cgi?id={id}&amp;action=edit\">edit</a></td>"
            )),
            key if is_mime_column(key) => {
                let class = mime_class(&record.declared_mimetype, &record.computed_mimetype);
                html.push_str(&format!(
                    "<td class=\"{class}\">{}</td>",
                    escape_html(record_field(record, key))
                ));
            }
            key => html.push_str(&format!(
                "<td>{}</td>",
                escape_html(record_field(record, key))
            )),
        }
    }
    html.push_str("</tr>\n");
}

/// Commit the rendered document to `path` in one write. A failure here is
/// fatal to the run; the report is its purpose.
pub fn write_report(path: &str, html: &str) -> Result<()> {
    fs::write(path, html)?;
    Ok(())
}

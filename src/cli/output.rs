//! Run summary output formatting

use crate::RunSummary;

/// Print the run summary as human-readable text.
pub fn format_text(summary: &RunSummary) {
    println!("Bugs listed:        {}", summary.total_listed);
    println!("Bugs processed:     {}", summary.processed);
    println!("Attachments seen:   {}", summary.aggregate.attachment_count());
    println!(
        "Declared '{}':      {}",
        summary.mimetype, summary.counters.mimetype_matches
    );
    if let Some(path) = &summary.report_path {
        println!("Report written to:  {path}");
    }

    if !summary.skipped.is_empty() {
        println!();
        println!("Bugs skipped: {}", summary.skipped.len());
        if summary.skipped.len() <= 5 {
            for skip in &summary.skipped {
                eprintln!("  {}: {}", skip.url, skip.message);
            }
        } else {
            for skip in &summary.skipped[..5] {
                eprintln!("  {}: {}", skip.url, skip.message);
            }
            eprintln!("  ... and {} more", summary.skipped.len() - 5);
        }
    }
}

/// Format the run summary as JSON
#[must_use]
pub fn format_json(summary: &RunSummary) -> String {
    let output = serde_json::json!({
        "query_url": summary.query_url,
        "mimetype": summary.mimetype,
        "bugs_listed": summary.total_listed,
        "bugs_processed": summary.processed,
        "attachments": summary.aggregate.attachment_count(),
        "mimetype_matches": summary.counters.mimetype_matches,
        "report": summary.report_path,
        "skipped_count": summary.skipped.len(),
        "skipped": if summary.skipped.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::json!(summary.skipped)
        }
    });

    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

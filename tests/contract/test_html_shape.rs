//! Contract test for the rendered report's table shape

use crate::fixtures::attachment_record;
use bzmime::io::report::render_report;
use bzmime::models::Aggregate;
use bzmime::RunOptions;

/// Two bugs, three attachments: one mismatch in the middle.
fn two_bug_aggregate() -> Aggregate {
    let mut aggregate = Aggregate::default();
    aggregate.insert(
        "100",
        vec![
            attachment_record("1", "a.odt", "application/octet-stream", "application/octet-stream"),
            attachment_record("2", "b.pdf", "application/pdf", "application/zip"),
        ],
    );
    aggregate.insert(
        "200",
        vec![attachment_record("3", "c.png", "image/png", "image/png")],
    );
    aggregate
}

fn rendered() -> String {
    render_report(&two_bug_aggregate(), &RunOptions::default())
}

#[test]
fn test_header_row_is_fixed() {
    let html = rendered();
    assert!(html.contains(
        "<tr><th>Bug</th><th>Attachment</th><th>Edit</th><th>Filename</th>\
         <th>Extension</th><th>Filepath</th><th>Declared MimeType</th>\
         <th>Computed MimeType</th><th>Last Changed</th></tr>"
    ));
}

#[test]
fn test_one_row_per_bug_and_per_attachment() {
    let html = rendered();
    // Header, two bug rows, three attachment rows.
    assert_eq!(html.matches("<tr>").count(), 6);
}

#[test]
fn test_rows_keep_aggregate_order() {
    let html = rendered();

    let bug_100 = html.find("show_bug.cgi?id=100").unwrap();
    let att_1 = html.find("attachment.cgi?id=1\"").unwrap();
    let att_2 = html.find("attachment.cgi?id=2\"").unwrap();
    let bug_200 = html.find("show_bug.cgi?id=200").unwrap();
    let att_3 = html.find("attachment.cgi?id=3\"").unwrap();

    assert!(bug_100 < att_1);
    assert!(att_1 < att_2);
    assert!(att_2 < bug_200);
    assert!(bug_200 < att_3);
}

#[test]
fn test_every_attachment_links_view_and_edit() {
    let html = rendered();
    assert_eq!(html.matches("show_bug.cgi?id=").count(), 2);
    assert_eq!(html.matches("&amp;action=edit").count(), 3);
    assert!(html.contains(
        "<td><a href=\"https://bugs.libreoffice.org/attachment.cgi?id=1&amp;action=edit\">edit</a></td>"
    ));
}

#[test]
fn test_mime_cells_carry_match_classes() {
    let html = rendered();
    // Each attachment row classes both of its MIME cells alike.
    assert_eq!(html.matches("class=\"match\"").count(), 4);
    assert_eq!(html.matches("class=\"no-match\"").count(), 2);
}

#[test]
fn test_bug_rows_have_no_mime_classes() {
    let html = rendered();
    // Only the six attachment MIME cells carry a class attribute; the bug
    // rows render the remaining columns as bare empty cells.
    assert_eq!(html.matches("class=\"").count(), 6);
    assert!(html.contains(
        "<td></td><td></td><td></td><td></td><td></td><td></td><td></td><td></td></tr>"
    ));
}

#[test]
fn test_heading_names_product_and_target() {
    let html = rendered();
    assert!(html.contains(
        "<h1><a href=\"https://bugs.libreoffice.org\">LibreOffice</a> \
         attachments declaring application/octet-stream</h1>"
    ));
}

#[test]
fn test_empty_aggregate_renders_header_only() {
    let html = render_report(&Aggregate::default(), &RunOptions::default());
    assert_eq!(html.matches("<tr>").count(), 1);
    assert!(html.contains("<table>"));
    assert!(html.ends_with("</html>\n"));
}

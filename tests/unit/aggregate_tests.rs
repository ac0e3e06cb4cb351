//! Unit tests for bug-id extraction, record fields, and the aggregate

#[cfg(test)]
mod tests {
    use crate::fixtures::attachment_record;
    use bzmime::models::Aggregate;
    use bzmime::services::aggregate::{
        attachment_filepath, bug_id_from_url, extension_of, normalize_change_time,
    };

    #[test]
    fn test_bug_id_from_plain_url() {
        let id = bug_id_from_url("https://bugs.libreoffice.org/show_bug.cgi?id=12345").unwrap();
        assert_eq!(id, "12345");
    }

    #[test]
    fn test_bug_id_uses_text_after_last_equals() {
        let id = bug_id_from_url("https://tracker.example/show_bug.cgi?fmt=plain&id=77").unwrap();
        assert_eq!(id, "77");
    }

    #[test]
    fn test_bug_id_rejects_url_without_parameter() {
        let err = bug_id_from_url("https://tracker.example/show_bug.cgi").unwrap_err();
        assert_eq!(err.code(), "parse");
        assert!(err.to_string().contains("no id parameter"));
    }

    #[test]
    fn test_bug_id_rejects_non_numeric_id() {
        let err = bug_id_from_url("https://tracker.example/show_bug.cgi?id=12x45").unwrap_err();
        assert_eq!(err.code(), "parse");
    }

    #[test]
    fn test_bug_id_rejects_empty_id() {
        assert!(bug_id_from_url("https://tracker.example/show_bug.cgi?id=").is_err());
    }

    #[test]
    fn test_extension_after_last_dot() {
        assert_eq!(extension_of("report.odt"), "odt");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of(".hidden"), "hidden");
    }

    #[test]
    fn test_extension_empty_cases() {
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("trailing."), "");
        assert_eq!(extension_of(""), "");
    }

    #[test]
    fn test_filepath_is_deterministic() {
        let a = attachment_filepath("attachments", "10", "1", "a.odt");
        let b = attachment_filepath("attachments", "10", "1", "a.odt");
        assert_eq!(a, "attachments/10_1_a.odt");
        assert_eq!(a, b);
    }

    #[test]
    fn test_filepath_distinct_for_distinct_id_pairs() {
        // Both pairs concatenate to "71200" without the separators.
        let a = attachment_filepath("attachments", "7", "1200", "same.odt");
        let b = attachment_filepath("attachments", "71", "200", "same.odt");
        assert_ne!(a, b);
    }

    #[test]
    fn test_filepath_flattens_path_separators() {
        // A tracker-supplied name must not be able to climb out of the
        // attachments directory.
        assert_eq!(
            attachment_filepath("attachments", "10", "1", "../../etc/passwd"),
            "attachments/10_1_.._.._etc_passwd"
        );
        assert_eq!(
            attachment_filepath("attachments", "10", "1", "..\\boot.ini"),
            "attachments/10_1_.._boot.ini"
        );
        assert_eq!(
            attachment_filepath("attachments", "10", "1", "nested/name.odt"),
            "attachments/10_1_nested_name.odt"
        );
    }

    #[test]
    fn test_normalize_change_time_rfc3339() {
        assert_eq!(
            normalize_change_time("2014-02-01T12:30:45Z"),
            "2014-02-01 12:30"
        );
        assert_eq!(
            normalize_change_time("2014-02-01T12:30:45+01:00"),
            "2014-02-01 12:30"
        );
    }

    #[test]
    fn test_normalize_change_time_compact_tracker_format() {
        assert_eq!(
            normalize_change_time("20140201T12:30:45"),
            "2014-02-01 12:30"
        );
    }

    #[test]
    fn test_normalize_change_time_passes_unknown_through() {
        assert_eq!(normalize_change_time("yesterday"), "yesterday");
        assert_eq!(normalize_change_time(""), "");
    }

    #[test]
    fn test_aggregate_preserves_insertion_order() {
        let mut aggregate = Aggregate::default();
        aggregate.insert("2", vec![attachment_record("20", "b.pdf", "application/pdf", "")]);
        aggregate.insert("1", vec![attachment_record("10", "a.odt", "application/odt", "")]);
        aggregate.insert("3", vec![]);

        let order: Vec<&str> = aggregate.bugs.iter().map(|b| b.bug_id.as_str()).collect();
        assert_eq!(order, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_aggregate_reinsert_replaces_in_place() {
        let mut aggregate = Aggregate::default();
        aggregate.insert("1", vec![attachment_record("10", "a.odt", "application/odt", "")]);
        aggregate.insert("2", vec![attachment_record("20", "b.pdf", "application/pdf", "")]);
        aggregate.insert(
            "1",
            vec![
                attachment_record("10", "a.odt", "application/odt", ""),
                attachment_record("11", "a2.odt", "application/odt", ""),
            ],
        );

        let order: Vec<&str> = aggregate.bugs.iter().map(|b| b.bug_id.as_str()).collect();
        assert_eq!(order, vec!["1", "2"]);
        assert_eq!(aggregate.get("1").unwrap().len(), 2);
    }

    #[test]
    fn test_aggregate_counts() {
        let mut aggregate = Aggregate::default();
        assert!(aggregate.is_empty());

        aggregate.insert("1", vec![attachment_record("10", "a.odt", "application/odt", "")]);
        aggregate.insert(
            "2",
            vec![
                attachment_record("20", "b.pdf", "application/pdf", ""),
                attachment_record("21", "c.ods", "application/ods", ""),
            ],
        );

        assert!(!aggregate.is_empty());
        assert_eq!(aggregate.bug_count(), 2);
        assert_eq!(aggregate.attachment_count(), 3);
        assert!(aggregate.get("3").is_none());
    }
}

//! Bug-list retrieval via the tracker's advanced-search Atom feed

use crate::io::http;
use crate::models::{BugList, BugRef};
use crate::{Error, Result, RunOptions};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use quick_xml::Reader;
use quick_xml::events::Event;

/// Retries after the first feed fetch attempt before giving up.
const FEED_RETRIES: usize = 3;

/// Escapes everything outside the RFC 3986 unreserved set, which is what
/// the tracker expects for query-string values.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the advanced-search feed URL for attachments declaring `mimetype`
/// within `product`.
#[must_use]
pub fn query_url(base_url: &str, mimetype: &str, product: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let v1 = utf8_percent_encode(mimetype, QUERY_VALUE);
    let product = utf8_percent_encode(product, QUERY_VALUE);
    format!(
        "{base}/buglist.cgi?query_format=advanced&f1=attachments.mimetype&v1={v1}&o1=equals&product={product}&ctype=atom"
    )
}

/// Parse an Atom feed body into bug references, preserving entry order.
///
/// Each `<entry><id>` holds a full bug-view URL. The feed-level `<id>` is
/// ignored. A body that is not well-formed XML, or whose root element is
/// not `<feed>`, is a parse failure so an error page never reads as "no
/// matching bugs"; a well-formed feed with no entries is a legitimate
/// empty result.
pub fn parse_feed(xml: &str) -> Result<Vec<BugRef>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut bugs = Vec::new();
    let mut saw_root = false;
    let mut in_entry = false;
    let mut in_entry_id = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if !saw_root {
                    check_feed_root(e.local_name().as_ref())?;
                    saw_root = true;
                }
                match e.local_name().as_ref() {
                    b"entry" => in_entry = true,
                    b"id" if in_entry => in_entry_id = true,
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) if !saw_root => {
                check_feed_root(e.local_name().as_ref())?;
                saw_root = true;
            }
            Ok(Event::Text(t)) if in_entry_id => {
                let url = t
                    .unescape()
                    .map_err(|e| Error::Parse(format!("bad text in feed entry id: {e}")))?
                    .into_owned();
                if !url.is_empty() {
                    bugs.push(BugRef { url });
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"entry" => in_entry = false,
                b"id" => in_entry_id = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Parse(format!("feed is not well-formed XML: {e}"))),
            Ok(_) => {}
        }
    }

    if !saw_root {
        return Err(Error::Parse("response is not an Atom feed".to_string()));
    }

    Ok(bugs)
}

fn check_feed_root(name: &[u8]) -> Result<()> {
    if name != b"feed" {
        return Err(Error::Parse(format!(
            "response is not an Atom feed (root element is <{}>)",
            String::from_utf8_lossy(name)
        )));
    }
    Ok(())
}

/// Fetch the bug list for the configured filter.
///
/// An unreachable feed is fatal after the retry budget: an empty result
/// must mean "no matching bugs", never "the tracker was down". Counts over
/// `max_bugs` are warned about here but every entry is still returned;
/// truncation to the cap happens in the collection loop.
pub fn fetch_bug_list(client: &reqwest::blocking::Client, opts: &RunOptions) -> Result<BugList> {
    opts.validate()?;

    let url = query_url(&opts.base_url, &opts.mimetype, &opts.product);
    log::debug!("bug list query: {url}");

    let body = http::fetch_with_retry(client, &url, FEED_RETRIES, &opts.cancel)?;
    let bugs = parse_feed(&body)?;

    if bugs.len() > opts.max_bugs {
        log::warn!(
            "query returned {} bugs, more than the configured maximum of {}; only the first {} will be processed",
            bugs.len(),
            opts.max_bugs,
            opts.max_bugs
        );
    }

    Ok(BugList {
        query_url: url,
        bugs,
    })
}

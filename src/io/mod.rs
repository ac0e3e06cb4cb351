//! Transport and artifact writers: HTTP fetch, report, attachment store, log

pub mod http;
pub mod report;
pub mod results_log;
pub mod store;

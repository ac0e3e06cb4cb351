//! Core services for bug listing, attachment queries, and aggregation

pub mod aggregate;
pub mod buglist;
pub mod rpc;
pub mod sniff;

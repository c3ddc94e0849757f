//! Output module for reporting crawl results
//!
//! This module handles reading aggregate counts from storage and printing
//! run reports to stdout.

pub mod stats;

pub use stats::{load_summary, print_report, print_run, print_summary, CrawlSummary};

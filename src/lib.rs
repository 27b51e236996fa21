//! # IPJournal - IPv4 access counter for log files
//!
//! Scans a plain-text log, pulls an IPv4 address and a `dd.MM.yyyy HH:mm:ss`
//! timestamp out of every line, keeps the lines that fall inside an optional
//! subnet and time window, and writes how often each address was seen.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  CLI (clap) + Config file (serde_yaml)                       │
//! │    └── file-log, file-output, address-*, time-*              │
//! ├──────────────────────────────────────────────────────────────┤
//! │  FilterParams::build                                         │
//! │    └── start address, mask + length, time window             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Journal (line source)                                       │
//! │    └── process_line per line, ScanSummary                    │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Output (result sink)                                        │
//! │    └── "<address>: <count>", atomic write                    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use ipjournal::filter::{FilterParams, RawFilter};
//! use ipjournal::processor::{process_line, IpCounts};
//!
//! let params = FilterParams::build(RawFilter {
//!     address_start: Some("192.168.1.1"),
//!     address_mask: Some("24"),
//!     time_start: Some("01.01.2020"),
//!     time_end: Some("31.12.2020"),
//! })?;
//!
//! let mut counts = IpCounts::new();
//! process_line("192.168.1.1: 01.01.2020 12:34:56 Some log message", &mut counts, &params)?;
//! assert_eq!(counts["192.168.1.1"], 1);
//! # Ok::<(), ipjournal::error::JournalError>(())
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`config`] - Config file loading and merging with CLI values
//! - [`error`] - Error types
//! - [`filter`] - Filter parameters and their builder
//! - [`journal`] - Reading a log file and running a whole batch
//! - [`output`] - Writing the count mapping
//! - [`processor`] - Per-line extraction and filtering
//! - [`utils`] - Formatting helpers
//! - [`validation`] - Address, mask and timestamp parsing

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod journal;
pub mod output;
pub mod processor;
pub mod utils;
pub mod validation;

pub use config::Config;
pub use error::JournalError;
pub use filter::FilterParams;

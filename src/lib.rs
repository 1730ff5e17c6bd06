//! # gv-tools - Sorted Log Bisection and GoveeBTTempLogger Viewer
//!
//! Finds records in large, line-sorted, append-only log files without reading them
//! whole, by binary searching directly over the file's bytes.
//!
//! ## Features
//!
//! - **Byte-stream bisection**: O(log n) seeks over any `Read + Seek` source
//! - **Generic keys**: any `Ord` key extracted by a caller-supplied function
//! - **Irregular input**: blank lines are skipped, malformed lines are reported
//! - **Log viewer**: `gv-view-log` prints GoveeBTTempLogger thermometer logs
//!
//! ## Architecture
//!
//! - [`error`] - Centralized error types and handling
//! - [`bisect`] - Binary search over sorted, line-based streams
//! - [`logs`] - GoveeBTTempLogger log discovery and line parsing
//! - [`config`] - Device names and log directory configuration
//! - [`units`], [`prompt`], [`pager`], [`cli`] - Command-line glue
//! - [`app`] - The `gv-view-log` application

// Core modules
pub mod bisect;
pub mod error;

// Log viewer
pub mod app;
pub mod cli;
pub mod config;
pub mod logs;
pub mod pager;
pub mod prompt;
pub mod units;

// Re-export commonly used types for convenience
pub use error::{GvError, Result};

pub use app::LogViewer;
pub use bisect::{
    bisect_file_left, bisect_file_leftmost, bisect_left, bisect_leftmost, Encoding, LineKey,
    TextReader,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

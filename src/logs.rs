//! GoveeBTTempLogger log files: discovery and line parsing.

mod reading;
mod table;

pub use reading::{timestamp_key, Reading};
pub use table::{LogTable, MonthLogs};

//! gv-view-log - View GoveeBTTempLogger thermometer logs in a friendlier format.

use anyhow::{Context, Result};
use gv_tools::cli::{command, ViewLogOptions};
use gv_tools::{GvError, LogViewer};

fn main() -> Result<()> {
    // Initialize logging; RUST_LOG=debug shows search and device resolution details
    env_logger::init();

    let matches = command().get_matches();
    let options =
        ViewLogOptions::from_matches(&matches).context("Failed to read command-line options")?;

    match LogViewer::new(options).and_then(LogViewer::run) {
        // The user backed out of the device prompt or quit the pager early
        Err(GvError::Cancelled | GvError::OutputClosed) => std::process::exit(1),
        result => result.context("Failed to show thermometer log"),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_version_constant() {
        assert!(!gv_tools::VERSION.is_empty());
    }
}

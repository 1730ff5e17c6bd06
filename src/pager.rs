//! Paged output through `$PAGER`.

use crate::error::{GvError, Result};
use log::debug;
use std::io::{self, IsTerminal, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

const DEFAULT_PAGER: &str = "less -FRX";

/// Output sink that feeds a pager process when stdout is a terminal.
///
/// Dropping a piped `Pager` closes the pager's input and waits for it to exit, so the
/// terminal is never handed back while the pager is still running.
#[derive(Debug)]
pub struct Pager {
    child: Option<Child>,
    stdin: Option<ChildStdin>,
}

impl Pager {
    /// Start `$PAGER` (default `less -FRX`), or write straight to stdout when stdout
    /// is not a terminal or the pager cannot be started
    pub fn start() -> Self {
        if !io::stdout().is_terminal() {
            return Self::stdout();
        }

        let command = std::env::var("PAGER")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PAGER.to_string());
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return Self::stdout();
        };

        let mut pager = Command::new(program);
        pager.args(parts);
        Self::spawn(pager).unwrap_or_else(|e| {
            debug!("failed to start pager {command:?}: {e}");
            Self::stdout()
        })
    }

    /// Write to stdout without a pager
    pub fn stdout() -> Self {
        Self {
            child: None,
            stdin: None,
        }
    }

    /// Run `command` with its stdin connected to this sink
    pub fn spawn(mut command: Command) -> io::Result<Self> {
        let mut child = command.stdin(Stdio::piped()).spawn()?;
        let stdin = child.stdin.take();
        Ok(Self {
            child: Some(child),
            stdin,
        })
    }

    /// Close the pager's input and wait for the user to quit it
    pub fn finish(mut self) -> Result<()> {
        if self.child.is_none() {
            io::stdout().flush()?;
        }
        self.close()
            .map_err(|e| GvError::file_error("Failed to wait for pager", e))
    }

    fn close(&mut self) -> io::Result<()> {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            child.wait()?;
        }
        Ok(())
    }
}

impl Drop for Pager {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            debug!("failed to wait for pager: {e}");
        }
    }
}

impl Write for Pager {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match (&mut self.stdin, &self.child) {
            (Some(stdin), _) => stdin.write(buf),
            (None, None) => io::stdout().write(buf),
            (None, Some(_)) => Err(io::ErrorKind::BrokenPipe.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.stdin {
            Some(stdin) => stdin.flush(),
            None => io::stdout().flush(),
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::NamedTempFile;

    fn cat_into(output: &NamedTempFile) -> Pager {
        let mut command = Command::new("cat");
        command.stdout(File::create(output.path()).unwrap());
        Pager::spawn(command).unwrap()
    }

    #[test]
    fn test_drop_waits_for_pager() {
        let output = NamedTempFile::new().unwrap();
        let mut pager = cat_into(&output);
        writeln!(pager, "first line").unwrap();
        drop(pager);

        // cat has exited, so everything it was sent is on disk
        assert_eq!(
            std::fs::read_to_string(output.path()).unwrap(),
            "first line\n"
        );
    }

    #[test]
    fn test_finish_waits_for_pager() {
        let output = NamedTempFile::new().unwrap();
        let mut pager = cat_into(&output);
        write!(pager, "a\nb\n").unwrap();
        pager.finish().unwrap();

        assert_eq!(std::fs::read_to_string(output.path()).unwrap(), "a\nb\n");
    }
}

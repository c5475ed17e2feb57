//! Optional transcript logging to a plain-text file.
//!
//! This is the conversation record, not the diagnostic channel; request
//! failures and internal warnings go through `tracing` instead.

use std::fs::OpenOptions;
use std::io::Write;

pub struct LoggingState {
    file_path: Option<String>,
    is_active: bool,
}

impl LoggingState {
    pub fn new(log_file: Option<String>) -> Result<Self, Box<dyn std::error::Error>> {
        let mut logging = LoggingState {
            file_path: None,
            is_active: false,
        };

        if let Some(path) = log_file {
            logging.set_log_file(path)?;
        }

        Ok(logging)
    }

    pub fn set_log_file(&mut self, path: String) -> Result<(), Box<dyn std::error::Error>> {
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(
            file,
            "## Logging started {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file)?;
        file.flush()?;

        self.file_path = Some(path);
        self.is_active = true;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Append one message to the log, preserving its line breaks, with a
    /// blank line after it for spacing.
    pub fn log_message(&self, content: &str) -> Result<(), Box<dyn std::error::Error>> {
        let Some(file_path) = self.file_path.as_ref().filter(|_| self.is_active) else {
            return Ok(());
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)?;

        for line in content.lines() {
            writeln!(file, "{}", line)?;
        }
        writeln!(file)?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn disabled_logging_is_a_noop() {
        let logging = LoggingState::new(None).expect("logging state");
        assert!(!logging.is_active());
        logging.log_message("dropped").expect("noop log");
    }

    #[test]
    fn enabled_logging_appends_messages() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("transcript.log");
        let logging =
            LoggingState::new(Some(path.to_string_lossy().into_owned())).expect("logging state");

        logging.log_message("You: hello").expect("log message");
        logging.log_message("hi there").expect("log message");

        let contents = std::fs::read_to_string(&path).expect("read log");
        assert!(contents.contains("## Logging started"));
        assert!(contents.contains("You: hello"));
        assert!(contents.contains("hi there"));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let result = LoggingState::new(Some("/nonexistent-dir/transcript.log".to_string()));
        assert!(result.is_err());
    }
}

//! Fatal errors and the process exit status each one maps to.

use std::fmt;

/// Exit status of a failed run. Recovered per-shape triangulation failures never reach here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bad arguments, or a tolerance, alpha or scale outside its range.
    Usage = 1,
    /// The input is missing or unreadable, or an output would be overwritten without `--force`.
    Input = 2,
    /// `convert` or `potrace` exited non-zero, or an output could not be written or rendered.
    Processing = 3,
    /// `convert` or `potrace` could not be started.
    Dependency = 4,
}

#[derive(Debug)]
pub struct CliError {
    pub code: ErrorCode,
    pub message: String,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Usage, message)
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Input, message)
    }

    pub fn processing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Processing, message)
    }

    pub fn dependency(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Dependency, message)
    }

    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.code as u8
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

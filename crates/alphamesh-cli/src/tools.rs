//! Wrappers around the external raster and tracing programs.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::{debug, info};

use crate::error::CliError;

/// An external program, optionally relocated through an environment variable.
#[derive(Debug, Clone)]
pub struct Tool {
    /// Name used in messages.
    pub name: &'static str,
    /// Program actually executed.
    pub program: String,
    version_flag: &'static str,
}

impl Tool {
    /// ImageMagick `convert`, overridable with `ALPHAMESH_CONVERT`.
    #[must_use]
    pub fn convert() -> Self {
        Self::from_env("convert", "ALPHAMESH_CONVERT", "-version")
    }

    /// `potrace`, overridable with `ALPHAMESH_POTRACE`.
    #[must_use]
    pub fn potrace() -> Self {
        Self::from_env("potrace", "ALPHAMESH_POTRACE", "--version")
    }

    fn from_env(name: &'static str, var: &str, version_flag: &'static str) -> Self {
        let program = std::env::var(var)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| name.to_string());
        Self {
            name,
            program,
            version_flag,
        }
    }

    /// Fails with a dependency error when the program cannot be started at all.
    pub fn ensure_available(&self) -> Result<(), CliError> {
        let status = Command::new(&self.program)
            .arg(self.version_flag)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(_) => {
                debug!(tool = self.name, program = %self.program, "found external program");
                Ok(())
            }
            Err(err) => Err(self.spawn_error(&err)),
        }
    }

    /// Runs the program to completion, turning a non-zero exit into a processing error.
    pub fn run<I, S>(&self, args: I) -> Result<(), CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(args).stdin(Stdio::null());
        debug!(tool = self.name, command = ?command, "running");

        let output = command.output().map_err(|err| self.spawn_error(&err))?;
        check_output(self.name, &output)
    }

    fn spawn_error(&self, err: &io::Error) -> CliError {
        if err.kind() == io::ErrorKind::NotFound {
            CliError::dependency(format!(
                "{} is required but `{}` was not found on PATH",
                self.name, self.program
            ))
        } else {
            CliError::processing(format!("failed to start {}: {err}", self.name))
        }
    }
}

fn check_output(name: &str, output: &Output) -> Result<(), CliError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = stderr.trim();
    Err(CliError::processing(if detail.is_empty() {
        format!("{name} exited with {}", output.status)
    } else {
        format!("{name} exited with {}: {detail}", output.status)
    }))
}

/// `convert` argument for the given opacity percentage.
#[must_use]
pub fn threshold_arg(alpha: f64) -> String {
    format!("{}%", 100.0 - alpha)
}

/// Reduces the image to a black silhouette on white: opaque enough pixels become black.
pub fn threshold(convert: &Tool, image: &Path, alpha: f64, bitmap: &Path) -> Result<(), CliError> {
    info!(input = %image.display(), alpha, "extracting alpha silhouette");
    convert.run([
        image.as_os_str(),
        OsStr::new("-alpha"),
        OsStr::new("extract"),
        OsStr::new("-threshold"),
        OsStr::new(&threshold_arg(alpha)),
        OsStr::new("-negate"),
        bitmap.as_os_str(),
    ])
}

/// Traces the silhouette into straight-segment vector text.
pub fn trace(potrace: &Tool, bitmap: &Path, eps: &Path) -> Result<(), CliError> {
    info!(input = %bitmap.display(), "tracing silhouette");
    potrace.run([
        OsStr::new("--backend"),
        OsStr::new("eps"),
        OsStr::new("--cleartext"),
        OsStr::new("--longcoding"),
        OsStr::new("--alphamax"),
        OsStr::new("0"),
        OsStr::new("--output"),
        eps.as_os_str(),
        bitmap.as_os_str(),
    ])
}

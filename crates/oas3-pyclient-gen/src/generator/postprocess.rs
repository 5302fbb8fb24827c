use std::{path::Path, process::Stdio};

use tokio::process::Command;

use crate::generator::metrics::GenerationWarning;

pub(crate) const DEFAULT_FORMATTER: &str = "ruff format";

/// External source formatter run on every written file.
///
/// The command line is split on whitespace; the file path is appended as the
/// last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
  program: String,
  args: Vec<String>,
}

impl Formatter {
  /// `None` for a blank command line.
  pub fn parse(command: &str) -> Option<Self> {
    let mut parts = command.split_whitespace().map(String::from);
    let program = parts.next()?;
    Some(Self {
      program,
      args: parts.collect(),
    })
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  /// Formats `file` in place. Failing to spawn the formatter and a non-zero
  /// exit are both reported as a warning; the file is left as written.
  pub async fn run(&self, file: &Path) -> Result<(), GenerationWarning> {
    let warning = |error: String| GenerationWarning::FormatterFailed {
      file: file.display().to_string(),
      error,
    };

    let output = Command::new(&self.program)
      .args(&self.args)
      .arg(file)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .output()
      .await
      .map_err(|err| warning(format!("{}: {err}", self.program)))?;

    if output.status.success() {
      return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    let reason = match stderr.trim() {
      "" => format!("{} exited with {}", self.program, output.status),
      message => message.to_string(),
    };
    Err(warning(reason))
  }
}

impl Default for Formatter {
  fn default() -> Self {
    Self {
      program: "ruff".to_string(),
      args: vec!["format".to_string()],
    }
  }
}

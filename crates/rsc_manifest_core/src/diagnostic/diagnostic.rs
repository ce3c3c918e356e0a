use std::fmt::Display;
use std::fmt::Formatter;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ErrorKind;

/// A user facing error or warning reported by a build
#[derive(Error, Debug, Deserialize, PartialEq, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
  /// A summary user-facing message
  pub message: String,

  /// Indicates where this diagnostic was emitted from
  pub origin: Option<String>,

  pub kind: Option<ErrorKind>,

  /// The resource the diagnostic is about
  pub file_path: Option<PathBuf>,

  /// Hints for the user
  pub hints: Option<Vec<String>>,
}

impl Display for Diagnostic {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match &self.kind {
      Some(kind) => write!(f, "{}: {}", kind, self.message),
      None => f.write_str(&self.message),
    }
  }
}

impl Diagnostic {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Diagnostic {
      message: message.into(),
      kind: Some(kind),
      ..Diagnostic::default()
    }
  }

  pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
    self.origin = Some(origin.into());
    self
  }

  pub fn with_file_path(mut self, file_path: impl Into<PathBuf>) -> Self {
    self.file_path = Some(file_path.into());
    self
  }

  pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
    self.hints.get_or_insert_with(Vec::new).push(hint.into());
    self
  }

  pub fn is_kind(&self, kind: ErrorKind) -> bool {
    self.kind == Some(kind)
  }
}

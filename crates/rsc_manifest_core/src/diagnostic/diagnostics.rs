use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::Deref;

use serde::Serialize;
use thiserror::Error;

use super::Diagnostic;

/// Every error a build phase reported, in report order
#[derive(Clone, Debug, Default, Error, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Deref for Diagnostics {
  type Target = [Diagnostic];

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Display for Diagnostics {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    for (index, diagnostic) in self.0.iter().enumerate() {
      if index > 0 {
        writeln!(f)?;
      }
      write!(f, "{}", diagnostic)?;
    }
    Ok(())
  }
}

impl FromIterator<Diagnostic> for Diagnostics {
  fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
    Diagnostics(iter.into_iter().collect())
  }
}

impl IntoIterator for Diagnostics {
  type Item = Diagnostic;
  type IntoIter = std::vec::IntoIter<Diagnostic>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

impl From<Vec<Diagnostic>> for Diagnostics {
  fn from(diagnostics: Vec<Diagnostic>) -> Self {
    Diagnostics(diagnostics)
  }
}

impl From<Diagnostic> for Diagnostics {
  fn from(diagnostic: Diagnostic) -> Self {
    Diagnostics(vec![diagnostic])
  }
}

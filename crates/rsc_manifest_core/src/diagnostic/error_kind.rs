use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ErrorKind {
  /// The build is set up in a way the manifests cannot be generated for
  ConfigurationError,
  /// The build is set up in a way that only partially supports client references
  ConfigurationWarning,
  /// The bundler could not add a module to the compilation
  InclusionFailure,
}

impl Display for ErrorKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let name = match self {
      ErrorKind::ConfigurationError => "ConfigurationError",
      ErrorKind::ConfigurationWarning => "ConfigurationWarning",
      ErrorKind::InclusionFailure => "InclusionFailure",
    };
    f.write_str(name)
  }
}

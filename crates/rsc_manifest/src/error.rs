use anyhow::anyhow;
use rsc_manifest_core::diagnostic::Diagnostic;
use rsc_manifest_core::diagnostic::Diagnostics;
use serde::Serialize;

/// Why a build produced no output
#[derive(Clone, Debug, PartialEq)]
pub enum BuildError {
  Diagnostic(Diagnostic),
  Diagnostics(Diagnostics),
  Unknown(String),
}

impl BuildError {
  /// Every diagnostic carried by the error, unknown errors have none
  pub fn diagnostics(&self) -> Vec<Diagnostic> {
    match self {
      BuildError::Diagnostic(diagnostic) => vec![diagnostic.clone()],
      BuildError::Diagnostics(diagnostics) => diagnostics.to_vec(),
      BuildError::Unknown(_) => Vec::new(),
    }
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      BuildError::Diagnostic(diagnostic) => write!(f, "{}", diagnostic),
      BuildError::Diagnostics(diagnostics) => write!(f, "{}", diagnostics),
      BuildError::Unknown(message) => f.write_str(message),
    }
  }
}

impl Serialize for BuildError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    match self {
      BuildError::Diagnostic(diagnostic) => diagnostic.serialize(serializer),
      BuildError::Diagnostics(diagnostics) => diagnostics.serialize(serializer),
      BuildError::Unknown(message) => message.serialize(serializer),
    }
  }
}

impl From<&anyhow::Error> for BuildError {
  fn from(error: &anyhow::Error) -> Self {
    if let Some(diagnostic) = error.downcast_ref::<Diagnostic>() {
      Self::Diagnostic(diagnostic.clone())
    } else if let Some(diagnostics) = error.downcast_ref::<Diagnostics>() {
      Self::Diagnostics(diagnostics.clone())
    } else if let Some(message) = error.downcast_ref::<String>() {
      Self::Unknown(message.clone())
    } else {
      Self::Unknown(format!("{:#}", error))
    }
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    BuildError::from(&error)
  }
}

impl From<BuildError> for anyhow::Error {
  fn from(value: BuildError) -> Self {
    match value {
      BuildError::Diagnostic(diagnostic) => anyhow!(diagnostic),
      BuildError::Diagnostics(diagnostics) => anyhow!(diagnostics),
      BuildError::Unknown(message) => anyhow!(message),
    }
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;
  use rsc_manifest_core::diagnostic::ErrorKind;
  use serde_json::json;

  use super::*;

  #[test]
  fn downcasts_diagnostics_from_context() {
    let diagnostic = Diagnostic::new(ErrorKind::InclusionFailure, "Failed to include /src/a.js");
    let error = Err::<(), _>(anyhow!("Module not found"))
      .map_err(|error| error.context(diagnostic.clone()))
      .unwrap_err();

    assert_eq!(BuildError::from(&error), BuildError::Diagnostic(diagnostic));
  }

  #[test]
  fn serializes_diagnostics_as_a_list() {
    let error = BuildError::Diagnostics(Diagnostics::from(vec![Diagnostic::new(
      ErrorKind::ConfigurationError,
      "Could not find an entry in the compilation.",
    )]));

    assert_eq!(
      serde_json::to_value(&error).unwrap(),
      json!([{
        "message": "Could not find an entry in the compilation.",
        "origin": null,
        "kind": "ConfigurationError",
        "filePath": null,
        "hints": null
      }])
    );
  }

  #[test]
  fn keeps_unknown_messages() {
    let error = BuildError::from(&anyhow!("boom"));

    assert_eq!(error, BuildError::Unknown(String::from("boom")));
    assert!(error.diagnostics().is_empty());
  }
}

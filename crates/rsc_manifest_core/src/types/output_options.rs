use serde::Deserialize;
use serde::Serialize;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputOptions {
  /// Prefix for chunk urls, may contain `[fullhash]` / `[hash]` placeholders
  pub public_path: String,
  pub cross_origin_loading: CrossOriginLoading,
}

/// The `crossorigin` attribute of dynamically loaded chunk scripts
///
/// Configured as `false`, `"anonymous"` or `"use-credentials"`.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "RawCrossOriginLoading", into = "RawCrossOriginLoading")]
pub enum CrossOriginLoading {
  #[default]
  Disabled,
  Anonymous,
  UseCredentials,
}

impl CrossOriginLoading {
  /// Value handed to the SSR runtime for the module loading `crossOrigin` field
  pub fn manifest_value(&self) -> Option<String> {
    match self {
      CrossOriginLoading::Disabled => None,
      CrossOriginLoading::Anonymous => Some(String::new()),
      CrossOriginLoading::UseCredentials => Some(String::from("use-credentials")),
    }
  }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum RawCrossOriginLoading {
  Bool(bool),
  String(String),
}

impl TryFrom<RawCrossOriginLoading> for CrossOriginLoading {
  type Error = String;

  fn try_from(value: RawCrossOriginLoading) -> Result<Self, Self::Error> {
    match value {
      RawCrossOriginLoading::Bool(false) => Ok(CrossOriginLoading::Disabled),
      RawCrossOriginLoading::String(value) if value == "anonymous" => {
        Ok(CrossOriginLoading::Anonymous)
      }
      RawCrossOriginLoading::String(value) if value == "use-credentials" => {
        Ok(CrossOriginLoading::UseCredentials)
      }
      other => Err(format!(
        "Invalid crossOriginLoading {:?}, expected false, \"anonymous\" or \"use-credentials\"",
        other
      )),
    }
  }
}

impl From<CrossOriginLoading> for RawCrossOriginLoading {
  fn from(value: CrossOriginLoading) -> Self {
    match value {
      CrossOriginLoading::Disabled => RawCrossOriginLoading::Bool(false),
      CrossOriginLoading::Anonymous => RawCrossOriginLoading::String(String::from("anonymous")),
      CrossOriginLoading::UseCredentials => {
        RawCrossOriginLoading::String(String::from("use-credentials"))
      }
    }
  }
}

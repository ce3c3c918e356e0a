use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

/// An id the bundler assigns to a module or chunk for use by the runtime loader.
///
/// Depending on the id strategy these are either numbers or strings. Both forms are written to
/// the manifests exactly as the bundler produced them.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(untagged)]
pub enum RuntimeId {
  Number(u64),
  String(String),
}

impl Display for RuntimeId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      RuntimeId::Number(number) => write!(f, "{}", number),
      RuntimeId::String(string) => f.write_str(string),
    }
  }
}

impl From<u64> for RuntimeId {
  fn from(value: u64) -> Self {
    RuntimeId::Number(value)
  }
}

impl From<&str> for RuntimeId {
  fn from(value: &str) -> Self {
    RuntimeId::String(value.to_string())
  }
}

impl From<String> for RuntimeId {
  fn from(value: String) -> Self {
    RuntimeId::String(value)
  }
}

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

/// A module record in the compiled output
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
  /// Unique key of the module within a compilation
  pub identifier: String,

  /// The resource the module was created from, including any query string
  #[serde(default)]
  pub resource: Option<String>,

  /// Import requests of the module in source order
  #[serde(default)]
  pub requests: Vec<String>,

  #[serde(skip)]
  pub exports_info: ExportsInfo,
}

impl Module {
  pub fn new(identifier: impl Into<String>) -> Self {
    let identifier = identifier.into();
    Module {
      resource: Some(identifier.clone()),
      identifier,
      ..Module::default()
    }
  }

  pub fn with_requests<I, S>(mut self, requests: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    self.requests = requests.into_iter().map(Into::into).collect();
    self
  }

  /// The canonical resource path used to match the module against path based conditions
  ///
  /// This is the resource without its query string. Modules without a resource (runtime or
  /// virtual modules) have none.
  pub fn name_for_condition(&self) -> Option<&str> {
    let resource = self.resource.as_deref()?;
    let path = resource.split('?').next().unwrap_or(resource);
    if path.is_empty() {
      None
    } else {
      Some(path)
    }
  }
}

/// Export usage recorded for a module
///
/// The bundler drops unused exports unless a runtime has the module's exports marked as used in
/// an unknown way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExportsInfo {
  used_in_unknown_way: BTreeSet<String>,
}

impl ExportsInfo {
  /// Returns true when the usage changed
  pub fn set_used_in_unknown_way(&mut self, runtime: &str) -> bool {
    self.used_in_unknown_way.insert(runtime.to_string())
  }

  pub fn is_used_in_unknown_way(&self, runtime: &str) -> bool {
    self.used_in_unknown_way.contains(runtime)
  }

  pub fn can_eliminate_unused_exports(&self) -> bool {
    self.used_in_unknown_way.is_empty()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn name_for_condition_strips_the_query() {
    let module = Module {
      identifier: String::from("css|/src/App.css?modules"),
      resource: Some(String::from("/src/App.css?modules")),
      ..Module::default()
    };

    assert_eq!(module.name_for_condition(), Some("/src/App.css"));
  }

  #[test]
  fn name_for_condition_is_none_without_resource() {
    let module = Module {
      identifier: String::from("webpack/runtime/ensure chunk"),
      resource: None,
      ..Module::default()
    };

    assert_eq!(module.name_for_condition(), None);
  }

  #[test]
  fn marks_exports_used_per_runtime() {
    let mut exports_info = ExportsInfo::default();

    assert!(exports_info.can_eliminate_unused_exports());
    assert!(exports_info.set_used_in_unknown_way("main"));
    assert!(!exports_info.set_used_in_unknown_way("main"));
    assert!(exports_info.is_used_in_unknown_way("main"));
    assert!(!exports_info.is_used_in_unknown_way("admin"));
    assert!(!exports_info.can_eliminate_unused_exports());
  }
}

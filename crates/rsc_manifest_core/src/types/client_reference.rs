use indexmap::IndexMap;
use serde::Deserialize;
use serde::Serialize;

use super::RuntimeId;

/// One client-exported binding of a module
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientReferenceEntry {
  /// Stable id the reference is keyed by in the client manifest
  #[serde(rename = "id", alias = "exportId")]
  pub export_id: String,

  /// The export name of the binding, `default` for default exports
  pub export_name: String,

  /// Id of the same binding in the server-side bundle
  ///
  /// Absent when the module has no server-side counterpart.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ssr_id: Option<RuntimeId>,
}

/// Client references keyed by the resource path of the module that declares them
///
/// Produced by the loader that tags client modules. The manifest generator only reads it.
pub type ClientReferencesMap = IndexMap<String, Vec<ClientReferenceEntry>>;

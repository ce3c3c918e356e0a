use indexmap::IndexSet;
use serde::Deserialize;

pub const DEFAULT_CLIENT_MANIFEST_FILENAME: &str = "react-client-manifest.json";
pub const DEFAULT_SSR_MANIFEST_FILENAME: &str = "react-ssr-manifest.json";

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RscClientPluginOptions {
  pub client_manifest_filename: Option<String>,
  pub ssr_manifest_filename: Option<String>,
  /// Stylesheet resources included with every entry
  pub styles: Option<IndexSet<String>>,
}

impl RscClientPluginOptions {
  /// Empty filenames fall back to the defaults
  pub fn client_manifest_filename(&self) -> String {
    non_empty_or(&self.client_manifest_filename, DEFAULT_CLIENT_MANIFEST_FILENAME)
  }

  pub fn ssr_manifest_filename(&self) -> String {
    non_empty_or(&self.ssr_manifest_filename, DEFAULT_SSR_MANIFEST_FILENAME)
  }
}

fn non_empty_or(value: &Option<String>, default: &str) -> String {
  value
    .as_deref()
    .filter(|value| !value.is_empty())
    .unwrap_or(default)
    .to_string()
}

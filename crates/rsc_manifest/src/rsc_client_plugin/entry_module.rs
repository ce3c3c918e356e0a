use rsc_manifest_core::compilation::Compilation;
use rsc_manifest_core::diagnostic::Diagnostic;
use rsc_manifest_core::diagnostic::ErrorKind;
use rsc_manifest_core::module_graph::ModuleIdx;

use super::PLUGIN_NAME;

/// The entry client references are attached to
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EntryModule {
  pub name: String,
  pub module_idx: ModuleIdx,
}

/// Finds the module of the first entry
///
/// Problems are reported on the compilation. Returns `None` when the build cannot continue.
pub(crate) fn get_entry_module(compilation: &mut Compilation) -> Option<EntryModule> {
  let mut entries = compilation.entries.iter();

  let Some((name, entry)) = entries.next() else {
    compilation.errors.push(
      Diagnostic::new(
        ErrorKind::ConfigurationError,
        "Could not find an entry in the compilation.",
      )
      .with_origin(PLUGIN_NAME)
      .with_hint("Configure at least one entry"),
    );
    return None;
  };

  let name = name.clone();
  let entry_dependency = compilation.entry_dependency(entry);

  if entries.next().is_some() {
    tracing::warn!(entry = %name, "Multiple entries, client references go to the first one");
    compilation.warnings.push(
      Diagnostic::new(
        ErrorKind::ConfigurationWarning,
        "Found multiple entries in the compilation, adding client reference chunks only to the first entry.",
      )
      .with_origin(PLUGIN_NAME),
    );
  }

  let Some(entry_dependency) = entry_dependency else {
    compilation.errors.push(
      Diagnostic::new(
        ErrorKind::ConfigurationError,
        "Could not find an entry dependency.",
      )
      .with_origin(PLUGIN_NAME),
    );
    return None;
  };

  let Some(module_idx) = compilation
    .module_graph
    .get_resolved_module(entry_dependency)
  else {
    compilation.errors.push(
      Diagnostic::new(
        ErrorKind::ConfigurationError,
        "Could not resolve the entry module.",
      )
      .with_origin(PLUGIN_NAME),
    );
    return None;
  };

  Some(EntryModule { name, module_idx })
}

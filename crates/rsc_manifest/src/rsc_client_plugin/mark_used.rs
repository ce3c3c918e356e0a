use rsc_manifest_core::compilation::Compilation;

use super::inclusions::Inclusions;

/// Keeps every export of the included modules in `runtime`
///
/// Nothing imports included modules statically, so without this the bundler would drop their
/// exports as unused.
pub(crate) fn mark_inclusions_used(
  compilation: &mut Compilation,
  inclusions: &Inclusions,
  runtime: &str,
) {
  for (_, inclusion) in inclusions.iter() {
    let Some(module_idx) = compilation
      .module_graph
      .get_resolved_module(inclusion.dependency_id)
    else {
      tracing::debug!(resource = %inclusion.resource, "Skipping unresolved inclusion");
      continue;
    };

    if let Some(module) = compilation.module_graph.module_mut(module_idx) {
      module.exports_info.set_used_in_unknown_way(runtime);
    }
  }
}

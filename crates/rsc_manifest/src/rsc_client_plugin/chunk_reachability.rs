use indexmap::IndexSet;
use rsc_manifest_core::compilation::Compilation;
use rsc_manifest_core::module_graph::ModuleIdx;
use rsc_manifest_core::types::ChunkFiles;

/// Script files the browser loads before a module can run
///
/// Looks at the chunks of the module and of every module it connects to directly. Chunks without
/// an id and chunks that are only part of initial loads are skipped.
pub(crate) fn chunks_to_load(compilation: &Compilation, module_idx: ModuleIdx) -> ChunkFiles {
  let chunk_graph = &compilation.chunk_graph;

  let mut chunk_set = chunk_graph.module_chunks(module_idx).collect::<IndexSet<_>>();
  for connected in compilation.module_graph.outgoing_connections(module_idx) {
    chunk_set.extend(chunk_graph.module_chunks(connected));
  }

  let mut chunks = ChunkFiles::default();
  for chunk_idx in chunk_set {
    let Some(chunk) = chunk_graph.chunk(chunk_idx) else {
      continue;
    };
    let Some(chunk_id) = &chunk.id else {
      tracing::trace!(chunk_idx, "Skipping chunk without id");
      continue;
    };
    if chunk_graph.is_only_initial(chunk_idx) {
      continue;
    }

    for file in chunk.files.iter().filter(|file| file.ends_with(".js")) {
      chunks.push(chunk_id.clone(), file.clone());
    }
  }

  chunks
}

use std::collections::HashMap;

use indexmap::IndexSet;

use crate::module_graph::ModuleIdx;
use crate::types::Chunk;
use crate::types::ChunkGroup;
use crate::types::RuntimeId;

pub type ChunkIdx = usize;
pub type ChunkGroupIdx = usize;

/// Assignment of modules to chunks and chunks to chunk groups
///
/// Filled in by the bundler once modules are final. Iteration orders are insertion orders.
#[derive(Clone, Debug, Default)]
pub struct ChunkGraph {
  chunks: Vec<Chunk>,
  chunk_groups: Vec<ChunkGroup>,
  groups_of_chunk: HashMap<ChunkIdx, IndexSet<ChunkGroupIdx>>,
  chunks_of_module: HashMap<ModuleIdx, IndexSet<ChunkIdx>>,
  module_ids: HashMap<ModuleIdx, RuntimeId>,
}

impl ChunkGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_chunk(&mut self, chunk: Chunk) -> ChunkIdx {
    self.chunks.push(chunk);
    self.chunks.len() - 1
  }

  pub fn chunk(&self, chunk_idx: ChunkIdx) -> Option<&Chunk> {
    self.chunks.get(chunk_idx)
  }

  pub fn chunk_mut(&mut self, chunk_idx: ChunkIdx) -> Option<&mut Chunk> {
    self.chunks.get_mut(chunk_idx)
  }

  pub fn chunks(&self) -> impl Iterator<Item = (ChunkIdx, &Chunk)> {
    self.chunks.iter().enumerate()
  }

  pub fn chunks_mut(&mut self) -> impl Iterator<Item = (ChunkIdx, &mut Chunk)> {
    self.chunks.iter_mut().enumerate()
  }

  pub fn add_chunk_group(&mut self, chunk_group: ChunkGroup) -> ChunkGroupIdx {
    self.chunk_groups.push(chunk_group);
    self.chunk_groups.len() - 1
  }

  pub fn connect_chunk_and_group(&mut self, chunk_idx: ChunkIdx, chunk_group_idx: ChunkGroupIdx) {
    self
      .groups_of_chunk
      .entry(chunk_idx)
      .or_default()
      .insert(chunk_group_idx);
  }

  pub fn connect_chunk_and_module(&mut self, chunk_idx: ChunkIdx, module_idx: ModuleIdx) {
    self
      .chunks_of_module
      .entry(module_idx)
      .or_default()
      .insert(chunk_idx);
  }

  /// Chunks containing the module, in the order the module was assigned to them
  pub fn module_chunks(&self, module_idx: ModuleIdx) -> impl Iterator<Item = ChunkIdx> + '_ {
    self
      .chunks_of_module
      .get(&module_idx)
      .into_iter()
      .flat_map(|chunks| chunks.iter().copied())
  }

  /// True when every group the chunk belongs to is initial
  ///
  /// Such chunks are already on the page and never need to be loaded on demand. A chunk that
  /// belongs to no group is not considered initial.
  pub fn is_only_initial(&self, chunk_idx: ChunkIdx) -> bool {
    let Some(groups) = self.groups_of_chunk.get(&chunk_idx) else {
      return false;
    };

    if groups.is_empty() {
      return false;
    }

    groups.iter().all(|group_idx| {
      self
        .chunk_groups
        .get(*group_idx)
        .is_some_and(|group| group.initial)
    })
  }

  /// True when the chunk belongs to an entrypoint, whose chunk tree carries the runtime
  pub fn has_runtime(&self, chunk_idx: ChunkIdx) -> bool {
    self.groups_of_chunk.get(&chunk_idx).is_some_and(|groups| {
      groups.iter().any(|group_idx| {
        self
          .chunk_groups
          .get(*group_idx)
          .is_some_and(|group| group.initial)
      })
    })
  }

  pub fn set_module_id(&mut self, module_idx: ModuleIdx, id: RuntimeId) {
    self.module_ids.insert(module_idx, id);
  }

  pub fn module_id(&self, module_idx: ModuleIdx) -> Option<&RuntimeId> {
    self.module_ids.get(&module_idx)
  }
}

//! Replays a recorded build of the host bundler
//!
//! A snapshot captures what the manifest generator needs from a finished build: the entries,
//! the modules with their import requests and ids, and how the bundler placed modules into
//! chunks. Running the [`Compiler`](crate::Compiler) over a snapshot reproduces that build with
//! the manifest generator plugged in.
use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use anyhow::Context;
use async_trait::async_trait;
use indexmap::IndexMap;
use rsc_manifest_core::chunk_graph::ChunkGroupIdx;
use rsc_manifest_core::compilation::Compilation;
use rsc_manifest_core::module_factory::InMemoryModuleFactory;
use rsc_manifest_core::module_factory::ModuleFactoryRef;
use rsc_manifest_core::plugin::BundlerPlugin;
use rsc_manifest_core::types::Chunk;
use rsc_manifest_core::types::ChunkGroup;
use rsc_manifest_core::types::Module;
use rsc_manifest_core::types::OutputOptions;
use rsc_manifest_core::types::RuntimeId;
use serde::Deserialize;

use crate::compiler::CompilerOptions;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotModule {
  #[serde(flatten)]
  pub module: Module,

  /// Id assigned by the bundler's module id strategy
  #[serde(default)]
  pub id: Option<RuntimeId>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotChunkGroup {
  pub name: Option<String>,
  pub initial: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotChunk {
  pub id: Option<RuntimeId>,
  pub name: Option<String>,
  pub files: Vec<String>,
  /// Identifiers of the modules in the chunk
  pub modules: Vec<String>,
  /// Indices into the snapshot's chunk groups
  pub groups: Vec<usize>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotAsset {
  pub name: String,
  #[serde(default)]
  pub source: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompilationSnapshot {
  pub context: PathBuf,
  #[serde(default)]
  pub hash: Option<String>,
  #[serde(default)]
  pub output: OutputOptions,
  /// Entry name to entry request
  pub entries: IndexMap<String, String>,
  #[serde(default)]
  pub modules: Vec<SnapshotModule>,
  #[serde(default)]
  pub chunk_groups: Vec<SnapshotChunkGroup>,
  #[serde(default)]
  pub chunks: Vec<SnapshotChunk>,
  /// Assets besides the chunk files, and sources for chunk files
  #[serde(default)]
  pub assets: Vec<SnapshotAsset>,
}

impl CompilationSnapshot {
  pub fn from_file(path: &Path) -> anyhow::Result<Self> {
    let contents = std::fs::read_to_string(path)
      .with_context(|| format!("Failed to read snapshot {}", path.display()))?;

    serde_json::from_str(&contents)
      .with_context(|| format!("Failed to parse snapshot {}", path.display()))
  }

  pub fn compiler_options(&self) -> CompilerOptions {
    CompilerOptions {
      context: self.context.clone(),
      entries: self.entries.clone(),
      output: self.output.clone(),
      ..CompilerOptions::default()
    }
  }

  pub fn module_factory(&self) -> ModuleFactoryRef {
    Arc::new(InMemoryModuleFactory::new(
      self.modules.iter().map(|module| module.module.clone()),
    ))
  }

  pub fn bundler(&self) -> SnapshotBundler {
    SnapshotBundler {
      hash: self.hash.clone(),
      module_ids: self
        .modules
        .iter()
        .filter_map(|module| {
          module
            .id
            .clone()
            .map(|id| (module.module.identifier.clone(), id))
        })
        .collect(),
      chunk_groups: self.chunk_groups.clone(),
      chunks: self.chunks.clone(),
      assets: self.assets.clone(),
    }
  }
}

/// Places modules into the chunks recorded in a snapshot
#[derive(Clone, Debug, Default)]
pub struct SnapshotBundler {
  hash: Option<String>,
  module_ids: HashMap<String, RuntimeId>,
  chunk_groups: Vec<SnapshotChunkGroup>,
  chunks: Vec<SnapshotChunk>,
  assets: Vec<SnapshotAsset>,
}

impl SnapshotBundler {
  fn asset_source(&self, name: &str) -> String {
    self
      .assets
      .iter()
      .find(|asset| asset.name == name)
      .map(|asset| asset.source.clone())
      .unwrap_or_default()
  }
}

#[async_trait]
impl BundlerPlugin for SnapshotBundler {
  #[tracing::instrument(level = "info", skip_all)]
  async fn bundle(&self, compilation: &mut Compilation) -> Result<(), anyhow::Error> {
    let module_ids = compilation
      .module_graph
      .modules()
      .filter_map(|(module_idx, module)| {
        self
          .module_ids
          .get(&module.identifier)
          .map(|id| (module_idx, id.clone()))
      })
      .collect::<Vec<_>>();
    for (module_idx, id) in module_ids {
      compilation.chunk_graph.set_module_id(module_idx, id);
    }

    let chunk_groups = self
      .chunk_groups
      .iter()
      .map(|group| {
        compilation.chunk_graph.add_chunk_group(ChunkGroup {
          name: group.name.clone(),
          initial: group.initial,
        })
      })
      .collect::<Vec<ChunkGroupIdx>>();

    for snapshot_chunk in &self.chunks {
      let chunk_idx = compilation.chunk_graph.add_chunk(Chunk {
        id: snapshot_chunk.id.clone(),
        name: snapshot_chunk.name.clone(),
        files: snapshot_chunk.files.iter().cloned().collect(),
        ..Chunk::default()
      });

      for group in &snapshot_chunk.groups {
        let chunk_group_idx = chunk_groups.get(*group).ok_or_else(|| {
          anyhow!(
            "Chunk {:?} belongs to unknown chunk group {}",
            snapshot_chunk.name,
            group
          )
        })?;
        compilation
          .chunk_graph
          .connect_chunk_and_group(chunk_idx, *chunk_group_idx);
      }

      for identifier in &snapshot_chunk.modules {
        match compilation.module_graph.module_by_identifier(identifier) {
          Some(module_idx) => compilation
            .chunk_graph
            .connect_chunk_and_module(chunk_idx, module_idx),
          None => tracing::debug!(%identifier, "Skipping chunk module that was not built"),
        }
      }

      for file in &snapshot_chunk.files {
        compilation.emit_asset(file.clone(), self.asset_source(file));
      }
    }

    for asset in &self.assets {
      compilation.emit_asset(asset.name.clone(), asset.source.clone());
    }

    if let Some(hash) = &self.hash {
      compilation.hash = Some(hash.clone());
    }

    Ok(())
  }
}

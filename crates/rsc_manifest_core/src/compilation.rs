use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::path::PathBuf;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Captures;
use regex::Regex;

use crate::chunk_graph::ChunkGraph;
use crate::diagnostic::Diagnostic;
use crate::diagnostic::ErrorKind;
use crate::module_factory::ModuleFactoryRef;
use crate::module_factory::ModuleTree;
use crate::module_graph::ModuleGraph;
use crate::module_graph::ModuleIdx;
use crate::types::Asset;
use crate::types::Dependency;
use crate::types::DependencyId;
use crate::types::DependencyKind;
use crate::types::Module;
use crate::types::OutputOptions;

/// Placeholder used in paths when the compilation has no hash yet
pub const HASH_PLACEHOLDER: &str = "XXXX";

static HASH_TEMPLATE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\[(?:full)?hash(?::(\d+))?\]").unwrap());

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryOptions {
  pub name: Option<String>,
  /// Entries whose runtime this entry is loaded into
  pub depend_on: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntryData {
  /// Dependencies the entry was configured with
  pub dependencies: Vec<DependencyId>,
  /// Dependencies added to the entry after the configured ones were built
  pub include_dependencies: Vec<DependencyId>,
  pub options: EntryOptions,
}

/// A single build of the module graph into chunks and assets
pub struct Compilation {
  /// Directory requests of entries and inclusions are resolved from
  pub context: PathBuf,
  pub module_factory: ModuleFactoryRef,
  pub entries: IndexMap<String, EntryData>,
  /// Inclusions without an entry name, loaded with every entry
  pub global_entry: EntryData,
  pub module_graph: ModuleGraph,
  pub chunk_graph: ChunkGraph,
  pub output_options: OutputOptions,
  pub hash: Option<String>,
  pub errors: Vec<Diagnostic>,
  pub warnings: Vec<Diagnostic>,
  assets: IndexMap<String, Asset>,
}

impl Debug for Compilation {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Compilation")
      .field("context", &self.context)
      .field("entries", &self.entries)
      .field("modules", &self.module_graph.len())
      .field("hash", &self.hash)
      .field("errors", &self.errors)
      .field("warnings", &self.warnings)
      .finish_non_exhaustive()
  }
}

impl Compilation {
  pub fn new(
    context: PathBuf,
    module_factory: ModuleFactoryRef,
    output_options: OutputOptions,
  ) -> Self {
    Compilation {
      context,
      module_factory,
      entries: IndexMap::new(),
      global_entry: EntryData::default(),
      module_graph: ModuleGraph::new(),
      chunk_graph: ChunkGraph::new(),
      output_options,
      hash: None,
      errors: Vec::new(),
      warnings: Vec::new(),
      assets: IndexMap::new(),
    }
  }

  /// Adds a built entry under `options.name`
  pub fn add_entry(
    &mut self,
    dependency: Dependency,
    tree: ModuleTree,
    options: EntryOptions,
  ) -> DependencyId {
    let name = options
      .name
      .clone()
      .unwrap_or_else(|| dependency.request.clone());
    let (dependency_id, _) = self.add_module_tree(dependency, tree);

    let entry = self.entries.entry(name).or_default();
    entry.dependencies.push(dependency_id);
    entry.options = options;

    dependency_id
  }

  /// Adds a built module tree to an entry after the configured entries were built
  ///
  /// Named inclusions become (or extend) the entry with that name. Unnamed inclusions go to the
  /// global entry.
  pub fn add_include(
    &mut self,
    dependency: Dependency,
    tree: ModuleTree,
    options: EntryOptions,
  ) -> DependencyId {
    let (dependency_id, _) = self.add_module_tree(dependency, tree);

    let entry = match &options.name {
      Some(name) => self
        .entries
        .entry(name.clone())
        .or_insert_with(|| EntryData {
          options: options.clone(),
          ..EntryData::default()
        }),
      None => &mut self.global_entry,
    };
    entry.include_dependencies.push(dependency_id);

    dependency_id
  }

  fn add_module_tree(
    &mut self,
    dependency: Dependency,
    tree: ModuleTree,
  ) -> (DependencyId, ModuleIdx) {
    let mut module_indices = HashMap::new();
    let mut added_modules = HashSet::new();
    for module in tree.modules {
      let identifier = module.identifier.clone();
      let existing = self.module_graph.module_by_identifier(&identifier);
      let module_idx = self.module_graph.add_module(module);
      if existing.is_none() {
        added_modules.insert(module_idx);
      }
      module_indices.insert(identifier, module_idx);
    }

    // Modules that were already in the graph keep the connections they have
    for (origin, request, target) in tree.connections {
      let (Some(origin), Some(target)) = (module_indices.get(&origin), module_indices.get(&target))
      else {
        continue;
      };
      if !added_modules.contains(origin) {
        continue;
      }
      let import = self.module_graph.add_dependency(Dependency::import(request));
      self
        .module_graph
        .set_resolved_module(Some(*origin), import, *target);
    }

    let root = match module_indices.get(&tree.root) {
      Some(root) => *root,
      None => self.module_graph.add_module(Module::new(tree.root)),
    };
    let dependency_id = self.module_graph.add_dependency(dependency);
    self
      .module_graph
      .set_resolved_module(None, dependency_id, root);

    (dependency_id, root)
  }

  /// Root dependencies of an entry that came from the entry configuration
  pub fn entry_dependency(&self, entry: &EntryData) -> Option<DependencyId> {
    entry.dependencies.iter().copied().find(|dependency_id| {
      self
        .module_graph
        .dependency(*dependency_id)
        .is_some_and(|dependency| dependency.kind == DependencyKind::Entry)
    })
  }

  /// Emits an asset into the build output
  ///
  /// Emitting different content under an existing name is reported as an error and keeps the
  /// first asset.
  pub fn emit_asset(&mut self, name: impl Into<String>, source: impl Into<Vec<u8>>) {
    let asset = Asset::new(name, source);

    if let Some(existing) = self.assets.get(&asset.name) {
      if existing.source != asset.source {
        self.errors.push(
          Diagnostic::new(
            ErrorKind::ConfigurationError,
            format!(
              "Conflict: Multiple assets emit different content to the same filename {}",
              asset.name
            ),
          )
          .with_file_path(&asset.name),
        );
      }
      return;
    }

    tracing::trace!(name = %asset.name, "Emitting asset");
    self.assets.insert(asset.name.clone(), asset);
  }

  pub fn get_asset(&self, name: &str) -> Option<&Asset> {
    self.assets.get(name)
  }

  /// Emitted assets in emission order
  pub fn assets(&self) -> impl Iterator<Item = &Asset> {
    self.assets.values()
  }

  pub fn into_assets(self) -> Vec<Asset> {
    self.assets.into_values().collect()
  }

  /// Interpolates the compilation hash into a path template
  ///
  /// Supports `[fullhash]` and `[hash]`, optionally truncated with `[hash:8]`. Without a hash
  /// the placeholder is substituted instead.
  pub fn get_path(&self, template: &str) -> String {
    let hash = self.hash.as_deref().unwrap_or(HASH_PLACEHOLDER);

    HASH_TEMPLATE
      .replace_all(template, |captures: &Captures| {
        let length = captures
          .get(1)
          .and_then(|length| length.as_str().parse::<usize>().ok())
          .unwrap_or(hash.len());
        hash.chars().take(length).collect::<String>()
      })
      .into_owned()
  }
}

use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::types::Dependency;
use crate::types::DependencyId;
use crate::types::Module;

pub type ModuleIdx = usize;

/// PetGraph-backed graph of the modules in a compilation
///
/// Edges are connections created by import dependencies, weighted by the dependency that
/// created them. Modules are deduplicated by identifier.
#[derive(Clone, Debug, Default)]
pub struct ModuleGraph {
  pub graph: StableDiGraph<ModuleIdx, DependencyId>,
  modules: Vec<Module>,
  module_idx_to_node_index: Vec<NodeIndex>,
  identifier_to_module_idx: HashMap<String, ModuleIdx>,
  dependencies: Vec<Dependency>,
  resolved_modules: HashMap<DependencyId, ModuleIdx>,
}

impl ModuleGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a module, or returns the existing module with the same identifier
  pub fn add_module(&mut self, module: Module) -> ModuleIdx {
    if let Some(existing) = self.identifier_to_module_idx.get(&module.identifier) {
      return *existing;
    }

    let module_idx = self.modules.len();
    self
      .identifier_to_module_idx
      .insert(module.identifier.clone(), module_idx);
    self.modules.push(module);

    let node_index = self.graph.add_node(module_idx);
    self.module_idx_to_node_index.push(node_index);

    module_idx
  }

  pub fn add_dependency(&mut self, dependency: Dependency) -> DependencyId {
    let dependency_id = DependencyId(self.dependencies.len());
    self.dependencies.push(dependency);
    dependency_id
  }

  /// Records what a dependency resolved to
  ///
  /// Dependencies with an origin module also create a connection from the origin to the
  /// resolved module.
  pub fn set_resolved_module(
    &mut self,
    origin: Option<ModuleIdx>,
    dependency_id: DependencyId,
    module_idx: ModuleIdx,
  ) {
    self.resolved_modules.insert(dependency_id, module_idx);

    if let Some(origin) = origin {
      self.graph.add_edge(
        self.module_idx_to_node_index[origin],
        self.module_idx_to_node_index[module_idx],
        dependency_id,
      );
    }
  }

  pub fn get_resolved_module(&self, dependency_id: DependencyId) -> Option<ModuleIdx> {
    self.resolved_modules.get(&dependency_id).copied()
  }

  pub fn dependency(&self, dependency_id: DependencyId) -> Option<&Dependency> {
    self.dependencies.get(dependency_id.0)
  }

  pub fn module(&self, module_idx: ModuleIdx) -> Option<&Module> {
    self.modules.get(module_idx)
  }

  pub fn module_mut(&mut self, module_idx: ModuleIdx) -> Option<&mut Module> {
    self.modules.get_mut(module_idx)
  }

  pub fn module_by_identifier(&self, identifier: &str) -> Option<ModuleIdx> {
    self.identifier_to_module_idx.get(identifier).copied()
  }

  /// All modules in the order they were added
  pub fn modules(&self) -> impl Iterator<Item = (ModuleIdx, &Module)> {
    self.modules.iter().enumerate()
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }

  /// Modules directly connected from `module_idx`, in the order the connections were made
  pub fn outgoing_connections(&self, module_idx: ModuleIdx) -> Vec<ModuleIdx> {
    let Some(node_index) = self.module_idx_to_node_index.get(module_idx) else {
      return Vec::new();
    };

    let mut edges = self
      .graph
      .edges_directed(*node_index, Direction::Outgoing)
      .map(|edge| (edge.id(), edge.target()))
      .collect::<Vec<_>>();

    // Adjacency lists iterate newest first
    edges.sort_by_key(|(edge_index, _)| *edge_index);

    edges
      .into_iter()
      .filter_map(|(_, target)| self.graph.node_weight(target).copied())
      .collect()
  }
}

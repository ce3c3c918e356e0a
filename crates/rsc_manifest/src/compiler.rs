use std::hash::Hasher;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use rsc_manifest_core::compilation::Compilation;
use rsc_manifest_core::compilation::EntryOptions;
use rsc_manifest_core::diagnostic::Diagnostic;
use rsc_manifest_core::diagnostic::Diagnostics;
use rsc_manifest_core::hash::IdentifierHasher;
use rsc_manifest_core::module_factory::build_module_tree;
use rsc_manifest_core::module_factory::ModuleFactoryRef;
use rsc_manifest_core::plugin::BundlerPlugin;
use rsc_manifest_core::plugin::CompilationPlugin;
use rsc_manifest_core::types::Asset;
use rsc_manifest_core::types::Dependency;
use rsc_manifest_core::types::OutputOptions;
use serde::Deserialize;

use crate::error::BuildError;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
  pub context: PathBuf,
  /// Entry name to entry request, resolved from `context`
  pub entries: IndexMap<String, String>,
  pub output: OutputOptions,
  /// Derive the compilation hash from the emitted assets when the bundler did not set one
  pub compute_hash: bool,
}

impl Default for CompilerOptions {
  fn default() -> Self {
    CompilerOptions {
      context: PathBuf::default(),
      entries: IndexMap::new(),
      output: OutputOptions::default(),
      compute_hash: true,
    }
  }
}

/// Output of a successful build
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildResult {
  pub assets: Vec<Asset>,
  pub warnings: Vec<Diagnostic>,
  pub hash: Option<String>,
}

/// Drives a compilation through its phases
///
/// Entries are built with the module factory, the bundler places modules into chunks and the
/// plugins observe every phase. A build fails, without assets, when any phase reports an error.
pub struct Compiler {
  options: CompilerOptions,
  module_factory: ModuleFactoryRef,
  bundler: Arc<dyn BundlerPlugin>,
  plugins: Vec<Box<dyn CompilationPlugin>>,
}

impl Compiler {
  pub fn new(
    options: CompilerOptions,
    module_factory: ModuleFactoryRef,
    bundler: Arc<dyn BundlerPlugin>,
  ) -> Self {
    Compiler {
      options,
      module_factory,
      bundler,
      plugins: Vec::new(),
    }
  }

  pub fn with_plugin(mut self, plugin: impl CompilationPlugin + 'static) -> Self {
    self.plugins.push(Box::new(plugin));
    self
  }

  pub async fn run(&mut self) -> Result<BuildResult, BuildError> {
    self.build().await.map_err(BuildError::from)
  }

  #[tracing::instrument(level = "info", skip_all)]
  async fn build(&mut self) -> anyhow::Result<BuildResult> {
    let mut compilation = Compilation::new(
      self.options.context.clone(),
      self.module_factory.clone(),
      self.options.output.clone(),
    );

    for plugin in self.plugins.iter_mut() {
      plugin.this_compilation(&mut compilation).await?;
    }

    tracing::info!("Building entries");
    for (name, request) in &self.options.entries {
      let tree =
        build_module_tree(self.module_factory.as_ref(), &compilation.context, request).await?;
      compilation.add_entry(
        Dependency::entry(request, Some(name.clone())),
        tree,
        EntryOptions {
          name: Some(name.clone()),
          ..EntryOptions::default()
        },
      );
    }

    for plugin in self.plugins.iter_mut() {
      plugin.finish_make(&mut compilation).await?;
    }
    fail_on_errors(&mut compilation)?;

    for plugin in self.plugins.iter_mut() {
      plugin.finish_modules(&mut compilation).await?;
    }

    tracing::info!("Bundling");
    self.bundler.bundle(&mut compilation).await?;

    self.collect_runtime_requirements(&mut compilation);

    if compilation.hash.is_none() && self.options.compute_hash {
      compilation.hash = Some(compilation_hash(&compilation));
    }

    tracing::info!("Processing assets");
    for plugin in self.plugins.iter_mut() {
      plugin.process_assets(&mut compilation).await?;
    }
    fail_on_errors(&mut compilation)?;

    let hash = compilation.hash.clone();
    let warnings = std::mem::take(&mut compilation.warnings);

    Ok(BuildResult {
      assets: compilation.into_assets(),
      warnings,
      hash,
    })
  }

  /// Lets plugins add runtime globals to every chunk that carries a runtime
  fn collect_runtime_requirements(&self, compilation: &mut Compilation) {
    let runtime_chunks = compilation
      .chunk_graph
      .chunks()
      .map(|(chunk_idx, _)| chunk_idx)
      .filter(|chunk_idx| compilation.chunk_graph.has_runtime(*chunk_idx))
      .collect::<Vec<_>>();

    for chunk_idx in runtime_chunks {
      let Some(chunk) = compilation.chunk_graph.chunk(chunk_idx) else {
        continue;
      };

      let mut runtime_requirements = chunk.runtime_requirements;
      for plugin in &self.plugins {
        plugin.additional_tree_runtime_requirements(chunk, &mut runtime_requirements);
      }

      if let Some(chunk) = compilation.chunk_graph.chunk_mut(chunk_idx) {
        chunk.runtime_requirements = runtime_requirements;
      }
    }
  }
}

fn fail_on_errors(compilation: &mut Compilation) -> Result<(), Diagnostics> {
  if compilation.errors.is_empty() {
    return Ok(());
  }

  Err(compilation.errors.drain(..).collect())
}

/// Hash over the emitted assets, in emission order
fn compilation_hash(compilation: &Compilation) -> String {
  let mut hasher = IdentifierHasher::default();
  for asset in compilation.assets() {
    hasher.write(asset.name.as_bytes());
    hasher.write(&asset.source);
  }
  format!("{:016x}", hasher.finish())
}

use async_trait::async_trait;

use crate::compilation::Compilation;
use crate::types::Chunk;
use crate::types::RuntimeGlobals;

/// Hooks into the phases of a compilation
///
/// Phases run strictly in this order, each only after the previous one completed for every
/// plugin:
///
/// 1. `this_compilation` once the compilation is created
/// 2. `finish_make` once the configured entries are built, the last point modules can be added
/// 3. `finish_modules` once all modules are resolved
/// 4. `additional_tree_runtime_requirements` for every chunk after bundling
/// 5. `process_assets` once chunks and the compilation hash are final
#[async_trait]
pub trait CompilationPlugin: Send + Sync {
  fn name(&self) -> &str;

  async fn this_compilation(&mut self, _compilation: &mut Compilation) -> anyhow::Result<()> {
    Ok(())
  }

  async fn finish_make(&mut self, _compilation: &mut Compilation) -> anyhow::Result<()> {
    Ok(())
  }

  async fn finish_modules(&mut self, _compilation: &mut Compilation) -> anyhow::Result<()> {
    Ok(())
  }

  fn additional_tree_runtime_requirements(
    &self,
    _chunk: &Chunk,
    _runtime_requirements: &mut RuntimeGlobals,
  ) {
  }

  async fn process_assets(&mut self, _compilation: &mut Compilation) -> anyhow::Result<()> {
    Ok(())
  }
}

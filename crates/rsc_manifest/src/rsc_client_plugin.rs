use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexSet;
use rsc_manifest_core::compilation::Compilation;
use rsc_manifest_core::plugin::CompilationPlugin;
use rsc_manifest_core::types::Chunk;
use rsc_manifest_core::types::ClientReferencesMap;
use rsc_manifest_core::types::RuntimeGlobals;

pub use self::inclusions::Inclusion;
pub use self::inclusions::InclusionId;
pub use self::inclusions::InclusionKind;
pub use self::inclusions::Inclusions;
pub use self::options::*;

use self::entry_module::get_entry_module;
use self::inclusions::include_client_references;
use self::manifest_emitter::ManifestEmitter;
use self::mark_used::mark_inclusions_used;

mod chunk_reachability;
mod entry_module;
mod inclusions;
mod manifest_emitter;
mod mark_used;
mod options;

pub(crate) const PLUGIN_NAME: &str = "RscClientPlugin";

/// Generates the manifests React Server Components use to load client references
///
/// Every module with client references is forced into the build as an entry of its own so it
/// ends up in a chunk the browser can load on demand. Once chunks are final, the client manifest
/// maps each reference to the chunks to load and the SSR manifest maps module ids to the
/// server-side bindings.
pub struct RscClientPlugin {
  client_references: Arc<ClientReferencesMap>,
  client_manifest_filename: String,
  ssr_manifest_filename: String,
  styles: IndexSet<String>,
  inclusions: Inclusions,
  runtime: Option<String>,
}

impl RscClientPlugin {
  pub fn new(client_references: Arc<ClientReferencesMap>, options: RscClientPluginOptions) -> Self {
    RscClientPlugin {
      client_references,
      client_manifest_filename: options.client_manifest_filename(),
      ssr_manifest_filename: options.ssr_manifest_filename(),
      styles: options.styles.unwrap_or_default(),
      inclusions: Inclusions::default(),
      runtime: None,
    }
  }

  /// Modules included by the current build
  pub fn inclusions(&self) -> &Inclusions {
    &self.inclusions
  }
}

#[async_trait]
impl CompilationPlugin for RscClientPlugin {
  fn name(&self) -> &str {
    PLUGIN_NAME
  }

  async fn this_compilation(&mut self, _compilation: &mut Compilation) -> anyhow::Result<()> {
    self.inclusions = Inclusions::default();
    self.runtime = None;
    Ok(())
  }

  #[tracing::instrument(level = "info", skip_all, fields(plugin = PLUGIN_NAME))]
  async fn finish_make(&mut self, compilation: &mut Compilation) -> anyhow::Result<()> {
    let Some(entry) = get_entry_module(compilation) else {
      return Ok(());
    };

    tracing::debug!(entry = %entry.name, module_idx = entry.module_idx, "Found entry module");

    self.inclusions = include_client_references(
      compilation,
      &self.client_references,
      &self.styles,
      &entry.name,
    )
    .await?;
    self.runtime = Some(entry.name);

    Ok(())
  }

  async fn finish_modules(&mut self, compilation: &mut Compilation) -> anyhow::Result<()> {
    if let Some(runtime) = &self.runtime {
      mark_inclusions_used(compilation, &self.inclusions, runtime);
    }
    Ok(())
  }

  fn additional_tree_runtime_requirements(
    &self,
    _chunk: &Chunk,
    runtime_requirements: &mut RuntimeGlobals,
  ) {
    runtime_requirements.insert(RuntimeGlobals::ENSURE_CHUNK);
    runtime_requirements.insert(RuntimeGlobals::COMPAT_GET_DEFAULT_EXPORT);
  }

  async fn process_assets(&mut self, compilation: &mut Compilation) -> anyhow::Result<()> {
    ManifestEmitter {
      client_references: &self.client_references,
      styles: &self.styles,
      client_manifest_filename: &self.client_manifest_filename,
      ssr_manifest_filename: &self.ssr_manifest_filename,
    }
    .emit(compilation)
  }
}

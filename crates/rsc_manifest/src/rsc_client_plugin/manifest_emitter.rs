use indexmap::IndexMap;
use indexmap::IndexSet;
use rsc_manifest_core::compilation::Compilation;
use rsc_manifest_core::types::ChunkLoadDescriptor;
use rsc_manifest_core::types::ClientManifest;
use rsc_manifest_core::types::ClientReferencesMap;
use rsc_manifest_core::types::ImportManifestEntry;
use rsc_manifest_core::types::ModuleLoading;
use rsc_manifest_core::types::SsrManifest;
use rsc_manifest_core::types::SsrModuleMetadata;

use super::chunk_reachability::chunks_to_load;

/// Writes the client and SSR manifests of a finished compilation
pub(crate) struct ManifestEmitter<'a> {
  pub client_references: &'a ClientReferencesMap,
  pub styles: &'a IndexSet<String>,
  pub client_manifest_filename: &'a str,
  pub ssr_manifest_filename: &'a str,
}

impl ManifestEmitter<'_> {
  #[tracing::instrument(level = "info", skip_all)]
  pub fn emit(&self, compilation: &mut Compilation) -> anyhow::Result<()> {
    let (client_manifest, module_map) = self.build_manifests(compilation);

    tracing::debug!(
      references = client_manifest.len(),
      modules = module_map.len(),
      "Emitting manifests"
    );
    compilation.emit_asset(
      self.client_manifest_filename,
      serde_json::to_string_pretty(&client_manifest)?,
    );

    let mut ssr_manifest = SsrManifest {
      module_map,
      module_loading: Some(module_loading(compilation)),
      styles: Vec::new(),
    };

    if !self.styles.is_empty() {
      if let Some(stylesheet) = compilation
        .assets()
        .find(|asset| asset.name.ends_with(".css"))
      {
        ssr_manifest.styles.push(stylesheet.name.clone());
      }
    }

    compilation.emit_asset(
      self.ssr_manifest_filename,
      serde_json::to_string_pretty(&ssr_manifest)?,
    );

    Ok(())
  }

  /// Builds the client manifest and the SSR module map from the modules in the graph
  pub fn build_manifests(
    &self,
    compilation: &Compilation,
  ) -> (ClientManifest, IndexMap<String, SsrModuleMetadata>) {
    let mut client_manifest = ClientManifest::new();
    let mut module_map = IndexMap::new();

    for (module_idx, module) in compilation.module_graph.modules() {
      let Some(entries) = module
        .name_for_condition()
        .and_then(|resource| self.client_references.get(resource))
      else {
        continue;
      };

      let chunks = chunks_to_load(compilation, module_idx);
      let mut ssr_module_metadata = SsrModuleMetadata::new();

      for entry in entries {
        client_manifest.insert(
          entry.export_id.clone(),
          ChunkLoadDescriptor {
            id: entry.ssr_id.clone(),
            name: entry.export_name.clone(),
            chunks: chunks.clone(),
            styles: Vec::new(),
          },
        );

        if let Some(ssr_id) = &entry.ssr_id {
          ssr_module_metadata.insert(
            entry.export_name.clone(),
            ImportManifestEntry {
              id: ssr_id.clone(),
              name: entry.export_name.clone(),
              chunks: Vec::new(),
            },
          );
        }
      }

      match compilation.chunk_graph.module_id(module_idx) {
        Some(module_id) => {
          module_map.insert(module_id.to_string(), ssr_module_metadata);
        }
        None => {
          tracing::debug!(module = %module.identifier, "Client reference module has no id");
        }
      }
    }

    (client_manifest, module_map)
  }
}

/// Where the SSR runtime loads client chunks from
pub(crate) fn module_loading(compilation: &Compilation) -> ModuleLoading {
  ModuleLoading {
    prefix: compilation.get_path(&compilation.output_options.public_path),
    cross_origin: compilation
      .output_options
      .cross_origin_loading
      .manifest_value(),
  }
}

#[cfg(test)]
mod tests {
  use indexmap::indexmap;
  use pretty_assertions::assert_eq;
  use rsc_manifest_core::types::Chunk;
  use rsc_manifest_core::types::ChunkGroup;
  use rsc_manifest_core::types::CrossOriginLoading;
  use rsc_manifest_core::types::Module;
  use rsc_manifest_core::types::RuntimeId;
  use serde_json::json;

  use crate::test_utils::add_entry;
  use crate::test_utils::asset_json;
  use crate::test_utils::empty_compilation;
  use crate::test_utils::reference;

  use super::*;

  fn references() -> ClientReferencesMap {
    indexmap! {
      String::from("/app/src/Button.js") => vec![
        reference("1", "default", Some("btn-ssr")),
        reference("2", "Small", None),
      ],
      String::from("/app/src/utils.js") => vec![reference("3", "format", None)],
    }
  }

  /// `main` holds every module, `Button.js` is also split into the lazy chunk `2`
  async fn compilation() -> Compilation {
    let mut compilation = empty_compilation();
    add_entry(&mut compilation, "main", "/app/src/index.js").await;

    let button = compilation
      .module_graph
      .module_by_identifier("/app/src/Button.js")
      .unwrap();

    let chunk_graph = &mut compilation.chunk_graph;
    let entrypoint = chunk_graph.add_chunk_group(ChunkGroup::entrypoint("main"));
    let lazy = chunk_graph.add_chunk_group(ChunkGroup::async_group(None));
    let main = chunk_graph.add_chunk(Chunk::new("main").with_files(["main.js"]));
    let lazy_chunk = chunk_graph.add_chunk(Chunk::new(2).with_files(["2.js"]));
    chunk_graph.connect_chunk_and_group(main, entrypoint);
    chunk_graph.connect_chunk_and_group(lazy_chunk, lazy);

    let modules = compilation
      .module_graph
      .modules()
      .map(|(module_idx, _)| module_idx)
      .collect::<Vec<_>>();
    for module_idx in modules {
      compilation
        .chunk_graph
        .connect_chunk_and_module(main, module_idx);
    }
    compilation
      .chunk_graph
      .connect_chunk_and_module(lazy_chunk, button);
    compilation
      .chunk_graph
      .set_module_id(button, RuntimeId::from(42));

    compilation.emit_asset("main.js", "");
    compilation.emit_asset("2.js", "");
    compilation
  }

  fn emit(compilation: &mut Compilation, references: &ClientReferencesMap, styles: &IndexSet<String>) {
    ManifestEmitter {
      client_references: references,
      styles,
      client_manifest_filename: "react-client-manifest.json",
      ssr_manifest_filename: "react-ssr-manifest.json",
    }
    .emit(compilation)
    .unwrap();
  }

  #[tokio::test]
  async fn builds_client_manifest_and_module_map() {
    let compilation = compilation().await;
    let references = references();
    let styles = IndexSet::new();
    let emitter = ManifestEmitter {
      client_references: &references,
      styles: &styles,
      client_manifest_filename: "react-client-manifest.json",
      ssr_manifest_filename: "react-ssr-manifest.json",
    };

    let (client_manifest, module_map) = emitter.build_manifests(&compilation);

    assert_eq!(
      serde_json::to_value(&client_manifest).unwrap(),
      json!({
        "1": { "id": "btn-ssr", "name": "default", "chunks": [2, "2.js"], "styles": [] },
        "2": { "name": "Small", "chunks": [2, "2.js"], "styles": [] },
        "3": { "name": "format", "chunks": [], "styles": [] }
      })
    );

    // utils.js has no module id so only shows up in the client manifest
    assert_eq!(
      serde_json::to_value(&module_map).unwrap(),
      json!({
        "42": {
          "default": { "id": "btn-ssr", "name": "default", "chunks": [] }
        }
      })
    );
  }

  #[test]
  fn matches_references_by_resource_path_without_query() {
    let mut compilation = empty_compilation();
    let button = compilation.module_graph.add_module(Module {
      identifier: String::from("css|/app/src/Button.js?client"),
      resource: Some(String::from("/app/src/Button.js?client")),
      ..Module::default()
    });
    let utils = compilation.module_graph.add_module(Module {
      identifier: String::from("/app/src/utils.js"),
      resource: None,
      ..Module::default()
    });
    compilation
      .chunk_graph
      .set_module_id(button, RuntimeId::from(5));
    compilation
      .chunk_graph
      .set_module_id(utils, RuntimeId::from(6));

    let references = references();
    let styles = IndexSet::new();
    let (client_manifest, module_map) = ManifestEmitter {
      client_references: &references,
      styles: &styles,
      client_manifest_filename: "react-client-manifest.json",
      ssr_manifest_filename: "react-ssr-manifest.json",
    }
    .build_manifests(&compilation);

    // utils.js has no resource so its references are never matched
    assert_eq!(
      serde_json::to_value(&client_manifest).unwrap(),
      json!({
        "1": { "id": "btn-ssr", "name": "default", "chunks": [], "styles": [] },
        "2": { "name": "Small", "chunks": [], "styles": [] }
      })
    );
    assert_eq!(
      serde_json::to_value(&module_map).unwrap(),
      json!({
        "5": {
          "default": { "id": "btn-ssr", "name": "default", "chunks": [] }
        }
      })
    );
  }

  #[tokio::test]
  async fn emits_both_manifests_pretty_printed() {
    let mut compilation = compilation().await;
    compilation.output_options.public_path = String::from("/static/[fullhash:4]/");
    compilation.hash = Some(String::from("abcdef0123456789"));

    emit(&mut compilation, &references(), &IndexSet::new());

    let client_manifest = compilation
      .get_asset("react-client-manifest.json")
      .and_then(|asset| asset.source_str())
      .unwrap();
    assert!(client_manifest.starts_with("{\n  \"1\": {\n    \"id\": \"btn-ssr\","));

    assert_eq!(
      asset_json(&compilation, "react-ssr-manifest.json"),
      json!({
        "moduleMap": {
          "42": { "default": { "id": "btn-ssr", "name": "default", "chunks": [] } }
        },
        "moduleLoading": { "prefix": "/static/abcd/" },
        "styles": []
      })
    );
  }

  #[tokio::test]
  async fn adds_the_first_stylesheet_when_styles_are_configured() {
    let mut compilation = compilation().await;
    compilation.emit_asset("main.css", "");
    compilation.emit_asset("2.css", "");

    emit(
      &mut compilation,
      &references(),
      &IndexSet::from([String::from("/app/src/App.css")]),
    );

    assert_eq!(
      asset_json(&compilation, "react-ssr-manifest.json")["styles"],
      json!(["main.css"])
    );
  }

  #[tokio::test]
  async fn ignores_stylesheets_without_configured_styles() {
    let mut compilation = compilation().await;
    compilation.emit_asset("main.css", "");

    emit(&mut compilation, &references(), &IndexSet::new());

    assert_eq!(
      asset_json(&compilation, "react-ssr-manifest.json")["styles"],
      json!([])
    );
  }

  #[tokio::test]
  async fn emitting_twice_produces_identical_manifests() {
    let mut first = compilation().await;
    let mut second = compilation().await;

    emit(&mut first, &references(), &IndexSet::new());
    emit(&mut second, &references(), &IndexSet::new());
    emit(&mut second, &references(), &IndexSet::new());

    assert!(second.errors.is_empty());
    for name in ["react-client-manifest.json", "react-ssr-manifest.json"] {
      assert_eq!(
        first.get_asset(name).map(|asset| &asset.source),
        second.get_asset(name).map(|asset| &asset.source)
      );
    }
  }

  #[test]
  fn module_loading_uses_placeholder_and_cross_origin() {
    let mut compilation = empty_compilation();
    compilation.output_options.public_path = String::from("https://cdn.example.com/[fullhash]/");
    compilation.output_options.cross_origin_loading = CrossOriginLoading::Anonymous;

    assert_eq!(
      module_loading(&compilation),
      ModuleLoading {
        prefix: String::from("https://cdn.example.com/XXXX/"),
        cross_origin: Some(String::new()),
      }
    );

    compilation.output_options.cross_origin_loading = CrossOriginLoading::UseCredentials;
    assert_eq!(
      module_loading(&compilation).cross_origin,
      Some(String::from("use-credentials"))
    );
  }
}

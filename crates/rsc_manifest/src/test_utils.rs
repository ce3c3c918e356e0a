use std::path::PathBuf;
use std::sync::Arc;

use indexmap::indexmap;
use rsc_manifest_core::compilation::Compilation;
use rsc_manifest_core::compilation::EntryOptions;
use rsc_manifest_core::module_factory::build_module_tree;
use rsc_manifest_core::module_factory::InMemoryModuleFactory;
use rsc_manifest_core::module_factory::ModuleFactoryRef;
use rsc_manifest_core::types::ClientReferenceEntry;
use rsc_manifest_core::types::ClientReferencesMap;
use rsc_manifest_core::types::Dependency;
use rsc_manifest_core::types::Module;
use rsc_manifest_core::types::OutputOptions;
use rsc_manifest_core::types::RuntimeId;
use serde_json::json;
use serde_json::Value;

use crate::snapshot::CompilationSnapshot;

/// Modules of the test application, requests are relative to the importing module
pub(crate) fn app_modules() -> Vec<Module> {
  vec![
    Module::new("/app/src/index.js").with_requests(["./App.js"]),
    Module::new("/app/src/App.js").with_requests(["./Button.js", "./App.css"]),
    Module::new("/app/src/Button.js").with_requests(["./utils.js"]),
    Module::new("/app/src/utils.js"),
    Module::new("/app/src/Dialog.js"),
    Module::new("/app/src/App.css"),
    Module::new("/app/src/admin.js").with_requests(["./Dialog.js"]),
  ]
}

pub(crate) fn compilation_with_factory(module_factory: ModuleFactoryRef) -> Compilation {
  Compilation::new(
    PathBuf::from("/app"),
    module_factory,
    OutputOptions::default(),
  )
}

pub(crate) fn empty_compilation() -> Compilation {
  compilation_with_factory(Arc::new(InMemoryModuleFactory::new(app_modules())))
}

/// Adds an entry with the module tree the compilation's factory builds for `identifier`
pub(crate) async fn add_entry(compilation: &mut Compilation, name: &str, identifier: &str) {
  let tree = build_module_tree(
    compilation.module_factory.as_ref(),
    &compilation.context,
    identifier,
  )
  .await
  .unwrap();

  compilation.add_entry(
    Dependency::entry(identifier, Some(name.to_string())),
    tree,
    EntryOptions {
      name: Some(name.to_string()),
      ..EntryOptions::default()
    },
  );
}

pub(crate) fn reference(export_id: &str, export_name: &str, ssr_id: Option<&str>) -> ClientReferenceEntry {
  ClientReferenceEntry {
    export_id: export_id.to_string(),
    export_name: export_name.to_string(),
    ssr_id: ssr_id.map(RuntimeId::from),
  }
}

pub(crate) fn button_references() -> Arc<ClientReferencesMap> {
  Arc::new(indexmap! {
    String::from("/app/src/Button.js") => vec![reference("1", "default", Some("btn-ssr"))],
  })
}

pub(crate) fn asset_json(compilation: &Compilation, name: &str) -> Value {
  let source = compilation
    .get_asset(name)
    .and_then(|asset| asset.source_str())
    .unwrap_or_else(|| panic!("Missing asset {}", name));
  serde_json::from_str(source).unwrap()
}

/// A build of the test application where `Button.js` is split into the lazy chunk `2`
pub(crate) fn app_snapshot() -> CompilationSnapshot {
  serde_json::from_value(json!({
    "context": "/app",
    "output": { "publicPath": "/static/" },
    "entries": { "main": "./src/index.js" },
    "modules": [
      { "identifier": "/app/src/index.js", "resource": "/app/src/index.js", "requests": ["./App.js"], "id": 0 },
      { "identifier": "/app/src/App.js", "resource": "/app/src/App.js", "requests": ["./Button.js", "./App.css"], "id": 1 },
      { "identifier": "/app/src/Button.js", "resource": "/app/src/Button.js", "requests": ["./utils.js"], "id": 7 },
      { "identifier": "/app/src/utils.js", "resource": "/app/src/utils.js", "id": 8 },
      { "identifier": "/app/src/App.css", "resource": "/app/src/App.css", "id": 9 },
      { "identifier": "/app/src/Dialog.js", "resource": "/app/src/Dialog.js", "id": 10 },
      { "identifier": "/app/src/admin.js", "resource": "/app/src/admin.js", "requests": ["./Dialog.js"], "id": 11 }
    ],
    "chunkGroups": [
      { "name": "main", "initial": true },
      { "name": null, "initial": false }
    ],
    "chunks": [
      {
        "id": "main",
        "name": "main",
        "files": ["main.js", "main.css"],
        "modules": ["/app/src/index.js", "/app/src/App.js", "/app/src/App.css", "/app/src/utils.js"],
        "groups": [0]
      },
      {
        "id": 2,
        "files": ["2.js"],
        "modules": ["/app/src/Button.js"],
        "groups": [1]
      }
    ]
  }))
  .unwrap()
}

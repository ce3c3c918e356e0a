use std::fmt;

use indexmap::IndexMap;
use serde::de::SeqAccess;
use serde::de::Visitor;
use serde::ser::SerializeSeq;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;

use super::RuntimeId;

/// Chunks a reference needs, as `(chunk id, script file)` pairs
///
/// Serialized as the flat `[chunkId, filename, chunkId, filename, ...]` sequence the runtime
/// expects, so the output always has an even length.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkFiles(Vec<(RuntimeId, String)>);

impl ChunkFiles {
  pub fn push(&mut self, chunk_id: RuntimeId, file: String) {
    self.0.push((chunk_id, file));
  }

  pub fn iter(&self) -> impl Iterator<Item = &(RuntimeId, String)> {
    self.0.iter()
  }

  /// Number of entries in the flat serialized form
  pub fn flat_len(&self) -> usize {
    self.0.len() * 2
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

impl From<Vec<(RuntimeId, String)>> for ChunkFiles {
  fn from(pairs: Vec<(RuntimeId, String)>) -> Self {
    ChunkFiles(pairs)
  }
}

impl Serialize for ChunkFiles {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    let mut seq = serializer.serialize_seq(Some(self.flat_len()))?;
    for (chunk_id, file) in &self.0 {
      seq.serialize_element(chunk_id)?;
      seq.serialize_element(file)?;
    }
    seq.end()
  }
}

impl<'de> Deserialize<'de> for ChunkFiles {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    struct ChunkFilesVisitor;

    impl<'de> Visitor<'de> for ChunkFilesVisitor {
      type Value = ChunkFiles;

      fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a flat sequence of chunk id and filename pairs")
      }

      fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
      where
        A: SeqAccess<'de>,
      {
        let mut pairs = Vec::new();
        while let Some(chunk_id) = seq.next_element::<RuntimeId>()? {
          let Some(file) = seq.next_element::<String>()? else {
            return Err(serde::de::Error::invalid_length(
              pairs.len() * 2 + 1,
              &"an even number of elements",
            ));
          };
          pairs.push((chunk_id, file));
        }
        Ok(ChunkFiles(pairs))
      }
    }

    deserializer.deserialize_seq(ChunkFilesVisitor)
  }
}

/// What the browser runtime needs to load a single client reference
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkLoadDescriptor {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<RuntimeId>,
  pub name: String,
  pub chunks: ChunkFiles,
  pub styles: Vec<String>,
}

/// Client reference export id to load descriptor
pub type ClientManifest = IndexMap<String, ChunkLoadDescriptor>;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportManifestEntry {
  pub id: RuntimeId,
  pub name: String,
  /// Always empty, the server loads modules from its own bundle
  pub chunks: Vec<String>,
}

/// Export name to server-side binding for one module
pub type SsrModuleMetadata = IndexMap<String, ImportManifestEntry>;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleLoading {
  pub prefix: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub cross_origin: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SsrManifest {
  /// Keyed by the build-time module id
  pub module_map: IndexMap<String, SsrModuleMetadata>,
  pub module_loading: Option<ModuleLoading>,
  pub styles: Vec<String>,
}

use xxhash_rust::xxh3::Xxh3;

/// Hasher for identifiers that end up in build output.
///
/// The hashes should be stable across runs, machines, platforms and versions, since they are
/// embedded in public paths and manifests.
pub type IdentifierHasher = Xxh3;

#[cfg(test)]
mod tests {
  use std::hash::Hasher;

  use super::*;

  fn hash(parts: &[&[u8]]) -> u64 {
    let mut hasher = IdentifierHasher::default();
    for part in parts {
      hasher.write(part);
    }
    hasher.finish()
  }

  #[test]
  fn hashes_are_stable() {
    assert_eq!(
      hash(&[b"react-client-manifest.json"]),
      hash(&[b"react-client-manifest.json"])
    );
    assert_ne!(
      hash(&[b"react-client-manifest.json"]),
      hash(&[b"react-ssr-manifest.json"])
    );
  }

  #[test]
  fn streamed_writes_match_a_single_write() {
    assert_eq!(hash(&[b"main", b".js"]), hash(&[b"main.js"]));
  }
}

//! Installation fingerprinting.
//!
//! A fingerprint identifies one (installation, API version) pair and is the
//! cache key for its synthesized surface. Identical inputs always yield the
//! identical identifier, so a surface generated once is found again by any
//! process looking at the same installation.

use std::path::Path;

use sha2::{Digest, Sha256};

/// A content-addressable cache key: the SHA-256 of the installation path,
/// hex encoded, joined with the API version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint for an installation path and API version.
    pub fn compute(installation: &Path, version: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(installation.to_string_lossy().as_bytes());
        let digest = hasher.finalize();
        Fingerprint(format!("{}-{version}", hex_encode(&digest)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn deterministic() {
        let path = PathBuf::from("/usr/bin/llvm-config");
        let a = Fingerprint::compute(&path, "18.1");
        let b = Fingerprint::compute(&path, "18.1");
        assert_eq!(a, b);
    }

    #[test]
    fn differs_by_installation() {
        let a = Fingerprint::compute(Path::new("/usr/bin/llvm-config"), "18.1");
        let b = Fingerprint::compute(Path::new("/opt/llvm/bin/llvm-config"), "18.1");
        assert_ne!(a, b);
    }

    #[test]
    fn differs_by_version() {
        let path = Path::new("/usr/bin/llvm-config");
        let a = Fingerprint::compute(path, "17.0");
        let b = Fingerprint::compute(path, "18.1");
        assert_ne!(a, b);
    }

    #[test]
    fn format_is_hash_dash_version() {
        let fp = Fingerprint::compute(Path::new("/usr/bin/llvm-config"), "18.1");
        let (hash, version) = fp.as_str().split_once('-').unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(version, "18.1");
    }
}

//! Fingerprinted surface store.
//!
//! One synthesized surface per distinct fingerprint, stored on disk:
//!
//! ```text
//! <cache_root>/
//!   <fingerprint>/
//!     surface.json    — serialized surface table
//! ```
//!
//! The contract is regenerate-if-missing, reuse-if-present: an existing
//! entry is returned verbatim and never regenerated, even if the underlying
//! declarations changed. Staleness is the caller's responsibility to avoid
//! by fingerprinting correctly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;
use veneer_surface::Surface;

use crate::error::{CacheError, Result};
use crate::fingerprint::Fingerprint;

/// A surface cache backed by the filesystem.
pub struct SurfaceCache {
    root: PathBuf,
    /// One lock per fingerprint, so check+produce+publish is atomic within
    /// the process while distinct fingerprints proceed independently.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SurfaceCache {
    /// Create a cache rooted at the given directory.
    pub fn new(root: PathBuf) -> Self {
        SurfaceCache {
            root,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether an entry exists for the fingerprint.
    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.surface_path(fingerprint).is_file()
    }

    /// Load the cached surface for a fingerprint, if present.
    pub fn load(&self, fingerprint: &Fingerprint) -> Result<Option<Surface>> {
        let path = self.surface_path(fingerprint);
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        let surface = serde_json::from_str(&content)?;
        Ok(Some(surface))
    }

    /// Return the surface for a fingerprint, generating and publishing it
    /// exactly once if absent.
    ///
    /// Concurrent callers with the same fingerprint serialize on a
    /// per-fingerprint lock, so `build` runs at most once per miss; callers
    /// with different fingerprints do not interfere. Publishing is a
    /// write-to-temp-then-rename, so readers never observe a partial entry.
    pub fn get_or_create<F>(&self, fingerprint: &Fingerprint, build: F) -> Result<Surface>
    where
        F: FnOnce() -> std::result::Result<Surface, veneer_surface::SurfaceError>,
    {
        let lock = self.lock_for(fingerprint);
        let _guard = match lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(surface) = self.load(fingerprint)? {
            debug!("cache hit for {fingerprint}");
            return Ok(surface);
        }

        debug!("cache miss for {fingerprint}, generating");
        let surface = build()?;
        self.publish(fingerprint, &surface)?;
        Ok(surface)
    }

    /// Remove the entry for a fingerprint. Returns whether one existed.
    pub fn remove(&self, fingerprint: &Fingerprint) -> Result<bool> {
        let dir = self.entry_dir(fingerprint);
        if dir.is_dir() {
            std::fs::remove_dir_all(&dir).map_err(|e| CacheError::Store {
                path: dir,
                detail: format!("removing cache entry: {e}"),
            })?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// List all cached fingerprints.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&self.root).map_err(|e| CacheError::Store {
            path: self.root.clone(),
            detail: format!("listing cache: {e}"),
        })? {
            let entry = entry.map_err(|e| CacheError::Store {
                path: self.root.clone(),
                detail: format!("reading entry: {e}"),
            })?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    entries.push(name.to_string());
                }
            }
        }
        entries.sort();
        Ok(entries)
    }

    fn publish(&self, fingerprint: &Fingerprint, surface: &Surface) -> Result<()> {
        let dir = self.entry_dir(fingerprint);
        std::fs::create_dir_all(&dir).map_err(|e| CacheError::Store {
            path: dir.clone(),
            detail: format!("creating cache dir: {e}"),
        })?;

        let json = serde_json::to_vec_pretty(surface)?;
        let mut temp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| CacheError::Store {
            path: dir.clone(),
            detail: format!("creating temp file: {e}"),
        })?;
        std::io::Write::write_all(&mut temp, &json)?;

        let path = self.surface_path(fingerprint);
        temp.persist(&path).map_err(|e| CacheError::Store {
            path,
            detail: format!("publishing cache entry: {}", e.error),
        })?;
        Ok(())
    }

    fn lock_for(&self, fingerprint: &Fingerprint) -> Arc<Mutex<()>> {
        let mut locks: MutexGuard<'_, _> = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        locks
            .entry(fingerprint.as_str().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn entry_dir(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.root.join(fingerprint.as_str())
    }

    fn surface_path(&self, fingerprint: &Fingerprint) -> PathBuf {
        self.entry_dir(fingerprint).join("surface.json")
    }
}

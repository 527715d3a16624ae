//! Read-only asset storage.
//!
//! Packaging the frontend is someone else's job; the gateway only needs a
//! path → bytes lookup that never changes after startup.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;

/// A packaged file and its validator, computed once when the bundle is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub contents: Bytes,
    /// Quoted strong `ETag`, e.g. `"abc123def"`.
    pub etag: Arc<str>,
}

impl Asset {
    pub fn new(contents: impl Into<Bytes>) -> Self {
        let contents = contents.into();
        let etag = generate_etag(&contents).into();
        Self { contents, etag }
    }
}

/// `ETag` from a fast content hash.
fn generate_etag(content: &[u8]) -> String {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("\"{:x}\"", hasher.finish())
}

/// Immutable lookup of packaged files by logical path (`js/app.js`, no leading slash).
pub trait AssetBundle: Send + Sync + 'static {
    fn get(&self, path: &str) -> Option<Asset>;
}

/// Bundle held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBundle {
    files: HashMap<String, Asset>,
}

impl MemoryBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file. Only used while building; the bundle is shared read-only afterwards.
    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Bytes>) {
        self.files.insert(path.into(), Asset::new(contents));
    }

    /// Read every regular file below `root` into memory.
    pub fn from_dir(root: &Path) -> io::Result<Self> {
        let mut bundle = Self::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in std::fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                let file_type = entry.file_type()?;

                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    let Ok(relative) = path.strip_prefix(root) else {
                        continue;
                    };
                    let key = relative
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/");
                    bundle.insert(key, std::fs::read(&path)?);
                }
            }
        }

        tracing::debug!(root = ?root, files = bundle.len(), "Asset bundle loaded");
        Ok(bundle)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl AssetBundle for MemoryBundle {
    fn get(&self, path: &str) -> Option<Asset> {
        self.files.get(path).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryBundle
where
    K: Into<String>,
    V: Into<Bytes>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bundle = Self::new();
        for (path, contents) in iter {
            bundle.insert(path, contents);
        }
        bundle
    }
}

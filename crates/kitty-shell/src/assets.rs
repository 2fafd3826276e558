use std::collections::BTreeMap;

/// Type of a bundled asset, mirroring the entry kinds of the embedded
/// archive the assets are shipped in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    Regular,
    Directory,
    Symlink { target: String },
}

/// A single bundled file. Owned by the store; read-only to consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub kind: AssetKind,
    pub data: Vec<u8>,
}

/// Read-only view over the bundled integration scripts, keyed by their
/// archive-relative path (for example `shell-integration/zsh/.zshenv`).
///
/// How the bytes are actually stored and decoded is up to the embedding
/// application; extraction only needs prefix listing and lookup.
pub trait AssetStore {
    /// Paths of all entries whose path starts with `prefix`, in sorted
    /// order so parent directories are seen before their contents.
    fn paths_matching(&self, prefix: &str) -> Vec<String>;

    fn entry(&self, path: &str) -> Option<&AssetEntry>;
}

/// In-memory [`AssetStore`]. The embedding application fills one of these
/// from its decoded archive; tests build small fixtures directly.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    entries: BTreeMap<String, AssetEntry>,
}

impl MemoryAssetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(
            path.into(),
            AssetEntry {
                kind: AssetKind::Regular,
                data: data.into(),
            },
        );
    }

    pub fn add_dir(&mut self, path: impl Into<String>) {
        self.entries.insert(
            path.into(),
            AssetEntry {
                kind: AssetKind::Directory,
                data: Vec::new(),
            },
        );
    }

    pub fn add_symlink(&mut self, path: impl Into<String>, target: impl Into<String>) {
        self.entries.insert(
            path.into(),
            AssetEntry {
                kind: AssetKind::Symlink {
                    target: target.into(),
                },
                data: Vec::new(),
            },
        );
    }
}

impl AssetStore for MemoryAssetStore {
    fn paths_matching(&self, prefix: &str) -> Vec<String> {
        self.entries
            .keys()
            .filter(|path| path.starts_with(prefix))
            .cloned()
            .collect()
    }

    fn entry(&self, path: &str) -> Option<&AssetEntry> {
        self.entries.get(path)
    }
}

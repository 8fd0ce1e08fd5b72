//! [`FileIndex`]: the single owner of all [`LogseqFile`] values (§3, §4.E, §9's
//! "cyclic file graph -> arena + weak reference by name" design note).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::file::LogseqFile;

/// Stable handle into the arena. Not derived from the path, so a file can be
/// looked up by identity even across a rename within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

#[derive(Debug, Default)]
pub struct FileIndex {
    arena: Vec<Option<LogseqFile>>,
    by_path: HashMap<PathBuf, FileId>,
    by_name: HashMap<String, Vec<FileId>>,
}

impl FileIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to all three lookups. Returns its identity.
    pub fn insert(&mut self, file: LogseqFile) -> FileId {
        let path = file.path.path.clone();
        let name = file.logical_name().to_string();
        let id = FileId(self.arena.len());
        self.arena.push(Some(file));
        self.by_path.insert(path, id);
        self.by_name.entry(name).or_default().push(id);
        id
    }

    #[must_use]
    pub fn by_identity(&self, id: FileId) -> Option<&LogseqFile> {
        self.arena.get(id.0).and_then(Option::as_ref)
    }

    pub fn by_identity_mut(&mut self, id: FileId) -> Option<&mut LogseqFile> {
        self.arena.get_mut(id.0).and_then(Option::as_mut)
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Vec<&LogseqFile> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.by_identity(*id))
            .collect()
    }

    #[must_use]
    pub fn by_path(&self, path: &Path) -> Option<&LogseqFile> {
        self.by_path.get(path).and_then(|id| self.by_identity(*id))
    }

    /// Identities for a logical name, for callers that need to mutate the
    /// matches rather than just read them (the graph analyzer's namespace
    /// backfill, §4.F.2).
    #[must_use]
    pub fn ids_by_name(&self, name: &str) -> Vec<FileId> {
        self.by_name.get(name).cloned().unwrap_or_default()
    }

    pub fn ids(&self) -> impl Iterator<Item = FileId> + '_ {
        self.arena
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|_| FileId(i)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogseqFile> {
        self.arena.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LogseqFile> {
        self.arena.iter_mut().filter_map(Option::as_mut)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes a single file by its path, if present, returning it so a
    /// caller can replace it with a freshly re-parsed version (§4.J
    /// incremental reuse: a changed file's stale cached entry must not
    /// linger alongside its re-parsed replacement).
    pub fn remove_by_path(&mut self, path: &Path) -> Option<LogseqFile> {
        let id = self.by_path.remove(path)?;
        let file = self.arena.get_mut(id.0).and_then(Option::take)?;
        if let Some(ids) = self.by_name.get_mut(file.logical_name()) {
            ids.retain(|existing| *existing != id);
        }
        Some(file)
    }

    /// Drops any file whose path no longer exists on disk (§4.J cache sync).
    pub fn remove_deleted_files(&mut self) {
        let gone: Vec<PathBuf> =
            self.by_path.keys().filter(|p| !p.exists()).cloned().collect();
        for path in gone {
            if let Some(id) = self.by_path.remove(&path) {
                if let Some(slot) = self.arena.get_mut(id.0) {
                    if let Some(file) = slot.take() {
                        if let Some(ids) = self.by_name.get_mut(file.logical_name()) {
                            ids.retain(|existing| *existing != id);
                        }
                    }
                }
            }
        }
    }

    /// All files matching a predicate (§4.E, generalized from the source's
    /// keyword-argument-keyed filtering into a closure).
    pub fn files_with<'a>(
        &'a self,
        predicate: impl Fn(&LogseqFile) -> bool + 'a,
    ) -> impl Iterator<Item = &'a LogseqFile> {
        self.iter().filter(move |f| predicate(f))
    }
}

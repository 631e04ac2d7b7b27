//! In-memory record store.
//!
//! Backing storage is plain vectors; references are 1-based indices (0 is
//! reserved for "no reference"). Intended for unit tests that don't want to
//! set up a database file.
//!
//! Unlike the durable backend, `add_file` performs no path canonicalization
//! or dedup, and name matches in `typename_find`/`member_lookup` are exact
//! rather than `LIKE`.

use std::path::Path;

use crate::error::{StoreError, StoreResult};
use crate::records::{
    FileId, MemberEntry, SourceLoc, TypeEntry, TypeId, TypeUseEntry, TypenameEntry,
};
use crate::store::{RecordStore, TypenameCursor};

#[derive(Debug, Default)]
pub struct MemStore {
    files: Vec<String>,
    types: Vec<(TypeEntry, SourceLoc)>,
    typenames: Vec<(TypenameEntry, SourceLoc)>,
    members: Vec<(MemberEntry, SourceLoc)>,
    type_uses: Vec<(TypeUseEntry, SourceLoc)>,
}

impl MemStore {
    pub fn new() -> Self {
        MemStore::default()
    }

    /// Number of stored type rows. Test helper.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Number of stored member rows. Test helper.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Number of stored type-use rows. Test helper.
    pub fn type_use_count(&self) -> usize {
        self.type_uses.len()
    }

    /// Stored typename rows. Test helper.
    pub fn typenames(&self) -> &[(TypenameEntry, SourceLoc)] {
        &self.typenames
    }

    /// Stored member rows. Test helper.
    pub fn members(&self) -> &[(MemberEntry, SourceLoc)] {
        &self.members
    }
}

impl RecordStore for MemStore {
    fn add_file(&mut self, path: &Path) -> StoreResult<FileId> {
        self.files.push(path.to_string_lossy().into_owned());
        Ok(FileId(self.files.len() as i64))
    }

    fn typename_lookup(&mut self, loc: &SourceLoc, entry: &TypenameEntry) -> StoreResult<TypeId> {
        for (candidate, cloc) in &self.typenames {
            if candidate.name != entry.name {
                continue;
            }
            if cloc.file != loc.file {
                continue;
            }
            // tag namespace is not shared with the typedef namespace
            if candidate.kind != entry.kind {
                continue;
            }
            return Ok(candidate.base_type);
        }
        Err(StoreError::NotFound)
    }

    fn type_insert(&mut self, loc: &SourceLoc, entry: &TypeEntry) -> StoreResult<TypeId> {
        self.types.push((*entry, *loc));
        Ok(TypeId(self.types.len() as i64))
    }

    fn typename_insert(&mut self, loc: &SourceLoc, entry: &TypenameEntry) -> StoreResult<()> {
        self.typenames.push((entry.clone(), *loc));
        Ok(())
    }

    fn member_insert(&mut self, loc: &SourceLoc, entry: &MemberEntry) -> StoreResult<()> {
        self.members.push((entry.clone(), *loc));
        Ok(())
    }

    fn type_use_insert(&mut self, loc: &SourceLoc, entry: &TypeUseEntry) -> StoreResult<()> {
        self.type_uses.push((*entry, *loc));
        Ok(())
    }

    fn file_lookup(&mut self, id: FileId) -> StoreResult<String> {
        let index = id.0.checked_sub(1).filter(|i| *i >= 0);
        match index.and_then(|i| self.files.get(i as usize)) {
            Some(path) => Ok(path.clone()),
            None => Err(StoreError::NotFound),
        }
    }

    fn type_lookup(&mut self, id: TypeId) -> StoreResult<(TypeEntry, SourceLoc)> {
        let index = id.0.checked_sub(1).filter(|i| *i >= 0);
        match index.and_then(|i| self.types.get(i as usize)) {
            Some(row) => Ok(*row),
            None => Err(StoreError::NotFound),
        }
    }

    fn member_lookup(
        &mut self,
        parent: TypeId,
        name: &str,
    ) -> StoreResult<(MemberEntry, SourceLoc)> {
        for (entry, loc) in &self.members {
            if entry.parent == parent && entry.name == name {
                return Ok((entry.clone(), *loc));
            }
        }
        Err(StoreError::NotFound)
    }

    fn typename_find(&mut self, name: &str) -> StoreResult<TypenameCursor> {
        let rows = self
            .typenames
            .iter()
            .filter(|(entry, _)| entry.name == name)
            .cloned()
            .collect();
        Ok(TypenameCursor::new(rows))
    }

    fn close(&mut self) -> StoreResult<()> {
        Ok(())
    }
}

//! No-op record store.
//!
//! Used for dry runs: every insert is accepted and discarded, every lookup
//! misses. Inserts still hand out unique ids so the indexer's id plumbing
//! behaves exactly as it does against a real backend.

use std::path::Path;

use crate::error::{StoreError, StoreResult};
use crate::records::{
    FileId, MemberEntry, SourceLoc, TypeEntry, TypeId, TypeUseEntry, TypenameEntry,
};
use crate::store::{RecordStore, TypenameCursor};

#[derive(Debug, Default)]
pub struct NopStore {
    next_file: i64,
    next_type: i64,
}

impl NopStore {
    pub fn new() -> Self {
        NopStore::default()
    }
}

impl RecordStore for NopStore {
    fn add_file(&mut self, _path: &Path) -> StoreResult<FileId> {
        self.next_file += 1;
        Ok(FileId(self.next_file))
    }

    fn typename_lookup(&mut self, _loc: &SourceLoc, _entry: &TypenameEntry) -> StoreResult<TypeId> {
        Err(StoreError::NotFound)
    }

    fn type_insert(&mut self, _loc: &SourceLoc, _entry: &TypeEntry) -> StoreResult<TypeId> {
        self.next_type += 1;
        Ok(TypeId(self.next_type))
    }

    fn typename_insert(&mut self, _loc: &SourceLoc, _entry: &TypenameEntry) -> StoreResult<()> {
        Ok(())
    }

    fn member_insert(&mut self, _loc: &SourceLoc, _entry: &MemberEntry) -> StoreResult<()> {
        Ok(())
    }

    fn type_use_insert(&mut self, _loc: &SourceLoc, _entry: &TypeUseEntry) -> StoreResult<()> {
        Ok(())
    }

    fn file_lookup(&mut self, _id: FileId) -> StoreResult<String> {
        Err(StoreError::NotFound)
    }

    fn type_lookup(&mut self, _id: TypeId) -> StoreResult<(TypeEntry, SourceLoc)> {
        Err(StoreError::NotFound)
    }

    fn member_lookup(
        &mut self,
        _parent: TypeId,
        _name: &str,
    ) -> StoreResult<(MemberEntry, SourceLoc)> {
        Err(StoreError::NotFound)
    }

    fn typename_find(&mut self, _name: &str) -> StoreResult<TypenameCursor> {
        Ok(TypenameCursor::empty())
    }

    fn close(&mut self) -> StoreResult<()> {
        Ok(())
    }
}

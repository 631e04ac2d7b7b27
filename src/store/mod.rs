//! Record store abstraction.
//!
//! This module provides backend-specific record store implementations
//! behind one object-safe trait:
//! - [`nop::NopStore`]: discards everything (dry runs)
//! - [`mem::MemStore`]: in-memory vectors (tests)
//! - [`sql::SqliteStore`]: durable SQLite database (production)
//!
//! All backends expose the same insert/lookup surface; the indexer and the
//! query tool hold a `Box<dyn RecordStore>` and never know which backend is
//! behind it.

pub mod mem;
pub mod nop;
pub mod sql;

use std::path::Path;

use crate::error::StoreResult;
use crate::records::{
    FileId, MemberEntry, SourceLoc, TypeEntry, TypeId, TypeUseEntry, TypenameEntry,
};

/// Record store operations - backend-agnostic interface.
///
/// Mutating operations on a read-only store fail with
/// [`StoreError::PermissionDenied`](crate::error::StoreError). Lookups
/// return [`StoreError::NotFound`](crate::error::StoreError) for expected
/// negatives; callers branch on it.
pub trait RecordStore {
    /// Insert a path for a source-containing file.
    ///
    /// Idempotent: if the canonicalized path already exists, the existing
    /// reference is returned and nothing is inserted.
    fn add_file(&mut self, path: &Path) -> StoreResult<FileId>;

    /// Look up a typename matching `entry` at `loc`.
    ///
    /// The bits checked for a match are the file, the scope, the name
    /// bytes, and the name kind (the tag namespace is disjoint from the
    /// typedef namespace; a row matching everything but the kind is
    /// `NotFound`).
    fn typename_lookup(&mut self, loc: &SourceLoc, entry: &TypenameEntry) -> StoreResult<TypeId>;

    /// Insert a new type row; returns its reference.
    ///
    /// This inserts only the type entry. It is the caller's job to follow
    /// with a `typename_insert` referencing the returned id.
    fn type_insert(&mut self, loc: &SourceLoc, entry: &TypeEntry) -> StoreResult<TypeId>;

    /// Insert a typename referencing an existing type.
    fn typename_insert(&mut self, loc: &SourceLoc, entry: &TypenameEntry) -> StoreResult<()>;

    /// Insert a member row.
    fn member_insert(&mut self, loc: &SourceLoc, entry: &MemberEntry) -> StoreResult<()>;

    /// Insert a type-use row.
    fn type_use_insert(&mut self, loc: &SourceLoc, entry: &TypeUseEntry) -> StoreResult<()>;

    /// Resolve a file reference to its stored path.
    fn file_lookup(&mut self, id: FileId) -> StoreResult<String>;

    /// Resolve a type reference to its entry and location.
    fn type_lookup(&mut self, id: TypeId) -> StoreResult<(TypeEntry, SourceLoc)>;

    /// Look up a member of struct/union `parent` with a name matching
    /// `name`. The durable backend matches with `LIKE` semantics.
    fn member_lookup(&mut self, parent: TypeId, name: &str)
        -> StoreResult<(MemberEntry, SourceLoc)>;

    /// Search for typenames matching `name` (`LIKE` semantics in the
    /// durable backend) and return a cursor over the matches.
    ///
    /// Even when nothing matches, an empty cursor is returned; the first
    /// `next()` call yields `false`.
    fn typename_find(&mut self, name: &str) -> StoreResult<TypenameCursor>;

    /// Release resources. For a durable read/write store this commits the
    /// pending transaction.
    fn close(&mut self) -> StoreResult<()>;
}

/// Cursor over typename search results.
///
/// Forward-only, single-pass, non-restartable. Use is:
///
/// ```ignore
/// let mut cur = store.typename_find("foo")?;
/// while cur.next() {
///     let (entry, loc) = cur.peek();
///     // entry/loc borrow from the cursor until the next `next()`
/// }
/// ```
#[derive(Debug)]
pub struct TypenameCursor {
    rows: Vec<(TypenameEntry, SourceLoc)>,
    /// None before the first `next()`; otherwise index of the current row.
    pos: Option<usize>,
}

impl TypenameCursor {
    pub(crate) fn new(rows: Vec<(TypenameEntry, SourceLoc)>) -> Self {
        TypenameCursor { rows, pos: None }
    }

    pub(crate) fn empty() -> Self {
        TypenameCursor::new(Vec::new())
    }

    /// Advance to the next typename. Returns true when a row is available.
    /// Any previously peeked entry is invalidated.
    pub fn next(&mut self) -> bool {
        let next = match self.pos {
            None => 0,
            Some(i) => i + 1,
        };
        if next < self.rows.len() {
            self.pos = Some(next);
            true
        } else {
            // exhausted; stay off the end so peek() panics rather than
            // returning stale data
            self.pos = Some(self.rows.len());
            false
        }
    }

    /// Return the current typename entry.
    ///
    /// The cursor must currently be on a row, i.e. the previous `next()`
    /// returned true.
    pub fn peek(&self) -> (&TypenameEntry, &SourceLoc) {
        let i = self.pos.expect("peek() before next()");
        let (entry, loc) = &self.rows[i];
        (entry, loc)
    }
}

/// Open the no-op store used for dry runs.
pub fn open_nop() -> Box<dyn RecordStore> {
    Box::new(nop::NopStore::new())
}

/// Open an in-memory store.
pub fn open_mem() -> Box<dyn RecordStore> {
    Box::new(mem::MemStore::new())
}

/// Open (creating if necessary) the durable store at `path`.
pub fn open_durable(path: &Path, read_only: bool) -> StoreResult<Box<dyn RecordStore>> {
    Ok(Box::new(sql::SqliteStore::open(path, read_only)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::NameKind;

    fn name_row(name: &str, base: i64) -> (TypenameEntry, SourceLoc) {
        (
            TypenameEntry {
                kind: NameKind::Direct,
                base_type: TypeId(base),
                name: name.to_string(),
            },
            SourceLoc::global(FileId(1), 1, 1),
        )
    }

    #[test]
    fn cursor_walks_rows_once() {
        let mut cur = TypenameCursor::new(vec![name_row("a", 1), name_row("b", 2)]);
        assert!(cur.next());
        assert_eq!(cur.peek().0.name, "a");
        // peek is stable until the next advance
        assert_eq!(cur.peek().0.name, "a");
        assert!(cur.next());
        assert_eq!(cur.peek().0.name, "b");
        assert!(!cur.next());
        assert!(!cur.next());
    }

    #[test]
    fn empty_cursor_yields_nothing() {
        let mut cur = TypenameCursor::empty();
        assert!(!cur.next());
    }

    #[test]
    #[should_panic]
    fn peek_before_next_panics() {
        let cur = TypenameCursor::new(vec![name_row("a", 1)]);
        let _ = cur.peek();
    }
}

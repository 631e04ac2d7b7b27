//! Durable SQLite record store.
//!
//! The production backend. Normalizes input on the way in (path
//! canonicalization, unsigned/signed range checks) and sanity-checks rows
//! on the way out.
//!
//! A read/write open starts a transaction immediately; it encloses the
//! entire indexing run and commits on close, so a crash mid-run leaves no
//! partial aggregate in the database. A read-only open starts no
//! transaction.

pub mod queries;
pub mod serial;

use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, error, info};

use crate::error::{StoreError, StoreResult};
use crate::records::{
    FileId, FuncId, MemberEntry, NameKind, SourceLoc, TypeEntry, TypeId, TypeKind, TypeUseEntry,
    TypenameEntry,
};
use crate::store::{RecordStore, TypenameCursor};
use queries::{LookupDesc, QueryDesc};
use serial::{BindValue, ColValue};

pub struct SqliteStore {
    conn: Connection,
    read_only: bool,
    txn_open: bool,
}

impl SqliteStore {
    /// Open (creating if necessary) the database at `path`.
    ///
    /// The database is opened with a private cache; it is not meant to be
    /// shared between processes for writing.
    pub fn open(path: &Path, read_only: bool) -> StoreResult<Self> {
        info!("open sqlite db '{}', ro={}", path.display(), read_only);

        let flags = if read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_PRIVATE_CACHE
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_PRIVATE_CACHE
        };
        let conn = Connection::open_with_flags(path, flags)?;

        // journal_mode returns the selected mode as a row
        conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))?;

        let mut store = SqliteStore {
            conn,
            read_only,
            txn_open: false,
        };

        if read_only {
            debug!("readonly db; skipping table creation");
            return Ok(store);
        }

        store.create_tables()?;

        // one transaction for the whole run; committed on close
        store.conn.execute_batch("BEGIN;")?;
        store.txn_open = true;

        Ok(store)
    }

    fn create_tables(&self) -> StoreResult<()> {
        for sql in queries::CREATE_TABLES {
            self.conn.execute_batch(sql)?;
        }
        Ok(())
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.read_only {
            Err(StoreError::PermissionDenied)
        } else {
            Ok(())
        }
    }

    /// Execute a registered lookup and deserialize its first row.
    ///
    /// Returns `NotFound` when the query yields no rows. Queries that are
    /// supposed to select one row may silently match more; only the first
    /// is returned.
    fn query_one(&self, desc: &'static LookupDesc, binds: &[BindValue]) -> StoreResult<Vec<ColValue>> {
        queries::assert_registered(&desc.base);
        let mut stmt = self.conn.prepare(desc.base.sql)?;
        serial::bind_row(&mut stmt, desc.base.binds, binds)?;
        let mut rows = stmt.raw_query();
        match rows.next()? {
            Some(row) => serial::read_row(row, desc.outputs),
            None => Err(StoreError::NotFound),
        }
    }

    /// Execute a registered insert and return the new rowid.
    fn exec_insert(&self, desc: &'static QueryDesc, binds: &[BindValue]) -> StoreResult<i64> {
        queries::assert_registered(desc);
        let mut stmt = self.conn.prepare(desc.sql)?;
        serial::bind_row(&mut stmt, desc.binds, binds)?;
        stmt.raw_execute()?;
        let rowid = self.conn.last_insert_rowid();
        assert!(rowid > 0);
        Ok(rowid)
    }

    /// Canonicalize `path`: resolve symlinks and collapse `.`/`//` so
    /// distinct textual spellings of one file map to one row. The file
    /// must exist.
    fn clean_path(path: &Path) -> StoreResult<PathBuf> {
        Ok(std::fs::canonicalize(path)?)
    }

    fn loc_from_cols(file: &ColValue, func: &ColValue, scope: &ColValue, line: &ColValue, column: &ColValue) -> SourceLoc {
        SourceLoc {
            file: FileId(file.rowid()),
            func: FuncId(func.rowid()),
            scope: scope.u32(),
            line: line.u32(),
            column: column.u32(),
        }
    }

    fn sanitize_rowid(rowid: i64) -> bool {
        rowid > 0
    }

    /// Deserialization sanity checks for a typename row coming off disk.
    fn sanitize_typename(entry: &TypenameEntry) -> bool {
        if !Self::sanitize_rowid(entry.base_type.0) {
            error!("corrupt: typename '{}' has bad base-type {}", entry.name, entry.base_type.0);
            return false;
        }
        if entry.name.is_empty() {
            error!("corrupt: typename with empty name");
            return false;
        }
        true
    }
}

impl RecordStore for SqliteStore {
    fn add_file(&mut self, path: &Path) -> StoreResult<FileId> {
        self.check_writable()?;

        let clean = Self::clean_path(path)?;
        let clean_str = clean.to_str().ok_or_else(|| {
            StoreError::InvalidInput(format!("non-utf8 path: {}", clean.display()))
        })?;
        debug!("path cleaned to '{}'", clean_str);

        // reinserting the same file is not an error; return the
        // preexisting id
        match self.query_one(&queries::FILE_LOOKUP, &[BindValue::Str(clean_str)]) {
            Ok(vals) => return Ok(FileId(vals[0].rowid())),
            Err(StoreError::NotFound) => {}
            Err(e) => return Err(e),
        }

        let rowid = self.exec_insert(
            &queries::FILE_INSERT,
            &[BindValue::Null, BindValue::Str(clean_str)],
        )?;
        Ok(FileId(rowid))
    }

    fn typename_lookup(&mut self, loc: &SourceLoc, entry: &TypenameEntry) -> StoreResult<TypeId> {
        assert!(!entry.name.is_empty());

        let vals = self.query_one(
            &queries::TYPENAME_LOOKUP,
            &[
                BindValue::U64(loc.file.0 as u64),
                BindValue::Str(&entry.name),
            ],
        )?;

        // the tag namespace is not shared with the typedef namespace:
        // `struct foo;` is different from `typedef struct {} foo;`
        let found_kind = vals[1].u32();
        if NameKind::from_u32(found_kind) != Some(entry.kind) {
            debug!(
                "typename lookup found matching row with wrong kind; found {}, expected {}",
                found_kind,
                entry.kind.as_u32()
            );
            return Err(StoreError::NotFound);
        }

        Ok(TypeId(vals[0].rowid()))
    }

    fn type_insert(&mut self, loc: &SourceLoc, entry: &TypeEntry) -> StoreResult<TypeId> {
        self.check_writable()?;
        assert!(entry.complete);

        let rowid = self.exec_insert(
            &queries::TYPE_INSERT,
            &[
                BindValue::Null,
                BindValue::U32(entry.kind.as_u32()),
                BindValue::U32(entry.complete as u32),
                BindValue::U64(loc.file.0 as u64),
                BindValue::U64(loc.func.0 as u64),
                BindValue::U32(loc.scope),
                BindValue::U32(loc.line),
                BindValue::U32(loc.column),
            ],
        )?;
        Ok(TypeId(rowid))
    }

    fn typename_insert(&mut self, loc: &SourceLoc, entry: &TypenameEntry) -> StoreResult<()> {
        self.check_writable()?;

        self.exec_insert(
            &queries::TYPENAME_INSERT,
            &[
                BindValue::Str(&entry.name),
                BindValue::U32(entry.kind.as_u32()),
                BindValue::U64(entry.base_type.0 as u64),
                BindValue::U64(loc.file.0 as u64),
                BindValue::U64(loc.func.0 as u64),
                BindValue::U32(loc.scope),
                BindValue::U32(loc.line),
                BindValue::U32(loc.column),
            ],
        )?;
        Ok(())
    }

    fn member_insert(&mut self, loc: &SourceLoc, entry: &MemberEntry) -> StoreResult<()> {
        self.check_writable()?;

        // base_type 0 means a primitive-typed member
        let base = entry.base_type.map(|id| id.0).unwrap_or(0);
        self.exec_insert(
            &queries::MEMBER_INSERT,
            &[
                BindValue::U64(entry.parent.0 as u64),
                BindValue::U64(base as u64),
                BindValue::Str(&entry.name),
                BindValue::U64(loc.file.0 as u64),
                BindValue::U32(loc.line),
                BindValue::U32(loc.column),
            ],
        )?;
        Ok(())
    }

    fn type_use_insert(&mut self, loc: &SourceLoc, entry: &TypeUseEntry) -> StoreResult<()> {
        self.check_writable()?;

        self.exec_insert(
            &queries::TYPE_USE_INSERT,
            &[
                BindValue::U64(entry.base_type.0 as u64),
                BindValue::U32(entry.kind.as_u32()),
                BindValue::U64(loc.file.0 as u64),
                BindValue::U32(loc.line),
                BindValue::U32(loc.column),
            ],
        )?;
        Ok(())
    }

    fn file_lookup(&mut self, id: FileId) -> StoreResult<String> {
        assert!(id.0 != 0);
        let vals = self.query_one(&queries::FILE_ID_LOOKUP, &[BindValue::U64(id.0 as u64)])?;
        Ok(vals.into_iter().next().expect("one output column").into_string())
    }

    fn type_lookup(&mut self, id: TypeId) -> StoreResult<(TypeEntry, SourceLoc)> {
        assert!(id.0 != 0);
        let vals = self.query_one(&queries::TYPE_LOOKUP, &[BindValue::U64(id.0 as u64)])?;

        assert_eq!(vals[0].rowid(), id.0);

        let kind = TypeKind::from_u32(vals[1].u32()).ok_or_else(|| {
            StoreError::Corruption(format!("type {} has bad kind {}", id.0, vals[1].u32()))
        })?;
        let entry = TypeEntry {
            kind,
            complete: vals[2].u32() != 0,
        };
        let loc = Self::loc_from_cols(&vals[3], &vals[4], &vals[5], &vals[6], &vals[7]);
        Ok((entry, loc))
    }

    fn member_lookup(
        &mut self,
        parent: TypeId,
        name: &str,
    ) -> StoreResult<(MemberEntry, SourceLoc)> {
        assert!(parent.0 != 0);

        let vals = self.query_one(
            &queries::MEMBER_LOOKUP,
            &[BindValue::U64(parent.0 as u64), BindValue::Str(name)],
        )?;

        let base = vals[1].rowid();
        let entry = MemberEntry {
            parent: TypeId(vals[0].rowid()),
            base_type: if base == 0 { None } else { Some(TypeId(base)) },
            name: vals[2].clone().into_string(),
        };
        let loc = SourceLoc {
            file: FileId(vals[3].rowid()),
            func: FuncId(0),
            scope: 0,
            line: vals[4].u32(),
            column: vals[5].u32(),
        };
        Ok((entry, loc))
    }

    fn typename_find(&mut self, name: &str) -> StoreResult<TypenameCursor> {
        let desc = &queries::TYPENAME_FIND;
        queries::assert_registered(&desc.base);

        let mut stmt = self.conn.prepare(desc.base.sql)?;
        serial::bind_row(&mut stmt, desc.base.binds, &[BindValue::Str(name)])?;

        let mut out = Vec::new();
        let mut rows = stmt.raw_query();
        while let Some(row) = rows.next()? {
            let vals = match serial::read_row(row, desc.outputs) {
                Ok(vals) => vals,
                Err(e) => {
                    // a corrupt row ends the scan; earlier rows stay usable
                    error!("corrupt: cannot deserialize typename row: {}", e);
                    break;
                }
            };

            let kind = match NameKind::from_u32(vals[1].u32()) {
                Some(kind) => kind,
                None => {
                    error!("corrupt: typename row has bad kind {}", vals[1].u32());
                    break;
                }
            };
            let entry = TypenameEntry {
                kind,
                base_type: TypeId(vals[2].rowid()),
                name: vals[0].clone().into_string(),
            };
            if !Self::sanitize_typename(&entry) {
                break;
            }
            let loc = Self::loc_from_cols(&vals[3], &vals[4], &vals[5], &vals[6], &vals[7]);
            out.push((entry, loc));
        }

        Ok(TypenameCursor::new(out))
    }

    fn close(&mut self) -> StoreResult<()> {
        if self.txn_open {
            debug!("flushing sqlite db");
            self.conn.execute_batch("COMMIT;")?;
            self.txn_open = false;
        }
        Ok(())
    }
}

impl Drop for SqliteStore {
    fn drop(&mut self) {
        if self.txn_open {
            if let Err(e) = self.conn.execute_batch("COMMIT;") {
                error!("cannot commit on drop: {}", e);
            }
        }
    }
}

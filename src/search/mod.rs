//! Query execution against a completed index.
//!
//! Parses a command string, runs the lookup against the record store, and
//! prints the results in the fixed line formats the query tool promises:
//!
//! ```text
//! type entry:  ID KIND at PATH:LINE:COL
//! typename:    BASE_ID 'NAME' at PATH:LINE:COL
//! member:      PARENT_ID.'NAME', type BASE_ID, at PATH:LINE:COL
//! ```
//!
//! `<none>` substitutes for an unknown file path.

pub mod parse;

use std::path::Path;

use tracing::{error, warn};

use crate::error::{StoreError, StoreResult};
use crate::records::{MemberEntry, SourceLoc, TypeEntry, TypeId, TypenameEntry};
use crate::store::{self, RecordStore};
use parse::{NameSpec, SearchCmd, TypeQuery};

/// Open `db_path` read-only, run one command string, print the results.
pub fn run_one_command(db_path: &Path, command: &str) -> StoreResult<()> {
    let query = parse::parse_command(command)?;

    let mut store = store::open_durable(db_path, true)?;
    let result = exec_search(store.as_mut(), &query);
    store.close()?;
    result
}

fn exec_search(store: &mut dyn RecordStore, cmd: &SearchCmd) -> StoreResult<()> {
    match cmd {
        SearchCmd::TypeDecl(query) => exec_search_type(store, query),
        SearchCmd::Typename(name) => print_all_typenames(store, name),
        SearchCmd::MemberDecl { base, member } => exec_search_member(store, base, member),
    }
}

fn exec_search_type(store: &mut dyn RecordStore, query: &TypeQuery) -> StoreResult<()> {
    let (id, entry, loc) = search_type_core(store, query)?;
    let file = file_name_or_none(store, &loc)?;
    print_type_entry(id, &entry, &loc, &file);
    Ok(())
}

fn exec_search_member(
    store: &mut dyn RecordStore,
    base: &TypeQuery,
    member: &str,
) -> StoreResult<()> {
    let (parent, _entry, _loc) = search_type_core(store, base)?;

    let (member_entry, member_loc) = match store.member_lookup(parent, member) {
        Ok(found) => found,
        Err(StoreError::NotFound) => {
            println!("no matching member");
            return Err(StoreError::NotFound);
        }
        Err(e) => {
            warn!("lookup member {} '{}' failed: {}", parent.0, member, e);
            return Err(e);
        }
    };

    let file = file_name_or_none(store, &member_loc)?;
    print_member_entry(parent, &member_entry, &member_loc, &file);
    Ok(())
}

/// Resolve a type query to a durable id and its entry.
///
/// User-facing misses and ambiguity are reported here; the error still
/// propagates so the process exit status reflects the failure.
fn search_type_core(
    store: &mut dyn RecordStore,
    query: &TypeQuery,
) -> StoreResult<(TypeId, TypeEntry, SourceLoc)> {
    let id = match query {
        TypeQuery::Id(rowid) => TypeId(*rowid),
        TypeQuery::Name(spec) => match find_one_type(store, spec) {
            Ok(id) => id,
            Err(StoreError::NotFound) => {
                println!("no matching type");
                return Err(StoreError::NotFound);
            }
            Err(StoreError::Ambiguous) => {
                println!("ambiguous typename");
                print_all_typenames(store, spec)?;
                return Err(StoreError::Ambiguous);
            }
            Err(e) => return Err(e),
        },
    };

    match store.type_lookup(id) {
        Ok((entry, loc)) => Ok((id, entry, loc)),
        Err(StoreError::NotFound) => {
            println!("no type matching id {}", id.0);
            Err(StoreError::NotFound)
        }
        Err(e) => {
            error!("lookup id {} failed: {}", id.0, e);
            Err(e)
        }
    }
}

/// Resolve `spec` to exactly one type id through the typename table.
///
/// All matching names must agree on the referenced type; disagreement is
/// [`StoreError::Ambiguous`].
fn find_one_type(store: &mut dyn RecordStore, spec: &NameSpec) -> StoreResult<TypeId> {
    if spec.elab.is_some() {
        return find_elab_type(store, spec);
    }

    let mut cursor = store.typename_find(&spec.name)?;

    if !cursor.next() {
        return Err(StoreError::NotFound);
    }
    let id = cursor.peek().0.base_type;

    while cursor.next() {
        if cursor.peek().0.base_type != id {
            // many names matching `spec` referencing different types
            return Err(StoreError::Ambiguous);
        }
    }

    Ok(id)
}

/// Elaborated variant of [`find_one_type`]: only direct tag names count,
/// and the type-table kind must match the keyword (`struct foo` never
/// matches `union foo`).
fn find_elab_type(store: &mut dyn RecordStore, spec: &NameSpec) -> StoreResult<TypeId> {
    let elab = spec.elab.expect("caller checked the elaborated kind");

    // collect first: the durable cursor forbids interleaved lookups
    let mut matches: Vec<TypenameEntry> = Vec::new();
    {
        let mut cursor = store.typename_find(&spec.name)?;
        while cursor.next() {
            let (entry, _) = cursor.peek();
            if entry.kind == crate::records::NameKind::Direct {
                matches.push(entry.clone());
            }
        }
    }

    let mut found: Option<TypeId> = None;
    for entry in &matches {
        let (type_entry, _) = match store.type_lookup(entry.base_type) {
            Ok(row) => row,
            Err(e) => {
                error!("corrupt: no type entry for {}: {}", entry.base_type.0, e);
                return Err(StoreError::Corruption(format!(
                    "typename '{}' references missing type {}",
                    entry.name, entry.base_type.0
                )));
            }
        };

        if type_entry.kind != elab {
            // different kind: `struct foo` != `union foo`
            continue;
        }

        match found {
            None => found = Some(entry.base_type),
            Some(id) if id != entry.base_type => return Err(StoreError::Ambiguous),
            Some(_) => {}
        }
    }

    found.ok_or(StoreError::NotFound)
}

/// Look up and print every typename matching `spec`.
///
/// Elaborated-name filtering is not applied here; `struct foo` and a
/// typedef `foo` both print.
fn print_all_typenames(store: &mut dyn RecordStore, spec: &NameSpec) -> StoreResult<()> {
    let mut rows: Vec<(TypenameEntry, SourceLoc)> = Vec::new();
    {
        let mut cursor = store.typename_find(&spec.name)?;
        while cursor.next() {
            let (entry, loc) = cursor.peek();
            rows.push((entry.clone(), *loc));
        }
    }

    for (entry, loc) in &rows {
        let file = file_name_or_none(store, loc)?;
        print_one_typename(entry, loc, &file);
    }
    Ok(())
}

/// Resolve a location's file to its path, or `<none>` when the store
/// doesn't know it.
fn file_name_or_none(store: &mut dyn RecordStore, loc: &SourceLoc) -> StoreResult<String> {
    if loc.file.0 == 0 {
        return Ok("<none>".to_string());
    }
    match store.file_lookup(loc.file) {
        Ok(path) => Ok(path),
        Err(StoreError::NotFound) => Ok("<none>".to_string()),
        Err(e) => Err(e),
    }
}

fn print_type_entry(id: TypeId, entry: &TypeEntry, loc: &SourceLoc, file: &str) {
    println!(
        "{} {} at {}:{}:{}",
        id.0,
        entry.kind.as_str(),
        file,
        loc.line,
        loc.column
    );
}

fn print_one_typename(entry: &TypenameEntry, loc: &SourceLoc, file: &str) {
    println!(
        "{} '{}' at {}:{}:{}",
        entry.base_type.0, entry.name, file, loc.line, loc.column
    );
}

fn print_member_entry(parent: TypeId, entry: &MemberEntry, loc: &SourceLoc, file: &str) {
    println!(
        "{}.'{}', type {}, at {}:{}:{}",
        parent.0,
        entry.name,
        entry.base_type.map(|id| id.0).unwrap_or(0),
        file,
        loc.line,
        loc.column
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FileId, NameKind, TypeKind};
    use crate::store::mem::MemStore;

    fn loc(file: FileId) -> SourceLoc {
        SourceLoc::global(file, 1, 1)
    }

    fn insert_type(db: &mut MemStore, file: FileId, kind: TypeKind, name: &str) -> TypeId {
        let id = db
            .type_insert(&loc(file), &TypeEntry { kind, complete: true })
            .unwrap();
        db.typename_insert(
            &loc(file),
            &TypenameEntry {
                kind: NameKind::Direct,
                base_type: id,
                name: name.into(),
            },
        )
        .unwrap();
        id
    }

    #[test]
    fn find_one_type_unique() {
        let mut db = MemStore::new();
        let file = db.add_file(Path::new("t.c")).unwrap();
        let id = insert_type(&mut db, file, TypeKind::Struct, "foo");

        let spec = NameSpec {
            elab: None,
            name: "foo".into(),
        };
        assert_eq!(find_one_type(&mut db, &spec).unwrap(), id);
    }

    #[test]
    fn find_one_type_not_found() {
        let mut db = MemStore::new();
        let spec = NameSpec {
            elab: None,
            name: "missing".into(),
        };
        assert!(matches!(
            find_one_type(&mut db, &spec),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn find_one_type_ambiguous() {
        let mut db = MemStore::new();
        let f1 = db.add_file(Path::new("a.c")).unwrap();
        let f2 = db.add_file(Path::new("b.c")).unwrap();
        insert_type(&mut db, f1, TypeKind::Struct, "foo");
        insert_type(&mut db, f2, TypeKind::Struct, "foo");

        let spec = NameSpec {
            elab: None,
            name: "foo".into(),
        };
        assert!(matches!(
            find_one_type(&mut db, &spec),
            Err(StoreError::Ambiguous)
        ));
    }

    #[test]
    fn duplicate_names_for_same_type_are_not_ambiguous() {
        let mut db = MemStore::new();
        let file = db.add_file(Path::new("t.c")).unwrap();
        let id = insert_type(&mut db, file, TypeKind::Struct, "foo");
        // a typedef alias for the same type
        db.typename_insert(
            &loc(file),
            &TypenameEntry {
                kind: NameKind::Typedef,
                base_type: id,
                name: "foo".into(),
            },
        )
        .unwrap();

        let spec = NameSpec {
            elab: None,
            name: "foo".into(),
        };
        assert_eq!(find_one_type(&mut db, &spec).unwrap(), id);
    }

    #[test]
    fn elaborated_search_filters_kind() {
        let mut db = MemStore::new();
        let file = db.add_file(Path::new("t.c")).unwrap();
        let struct_id = insert_type(&mut db, file, TypeKind::Struct, "foo");
        // a typedef with the same name pointing elsewhere must not
        // confuse the elaborated search
        let union_id = insert_type(&mut db, file, TypeKind::Union, "u");
        db.typename_insert(
            &loc(file),
            &TypenameEntry {
                kind: NameKind::Typedef,
                base_type: union_id,
                name: "foo".into(),
            },
        )
        .unwrap();

        let spec = NameSpec {
            elab: Some(TypeKind::Struct),
            name: "foo".into(),
        };
        assert_eq!(find_elab_type(&mut db, &spec).unwrap(), struct_id);

        let spec = NameSpec {
            elab: Some(TypeKind::Union),
            name: "foo".into(),
        };
        assert!(matches!(
            find_elab_type(&mut db, &spec),
            Err(StoreError::NotFound)
        ));
    }
}

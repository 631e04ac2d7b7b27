//! Core indexing: drives the frontend's cursor stream and translates
//! declarations into store records.
//!
//! Each translation unit is processed in two steps: the include closure is
//! enumerated and every file gets a durable reference, then the top-level
//! cursors are walked. Typedefs turn into typename records directly;
//! struct/union/enum declarations go through the staging scoreboard so the
//! whole subtree commits or drops as a unit (see
//! [`scoreboard::Scoreboard`]).
//!
//! Indexing an unnamed aggregate requires inspecting two sibling nodes:
//!
//! ```c
//! typedef struct { int a; } foo_t;
//! ```
//!
//! lowers to an unnamed record cursor followed by a typedef cursor. The
//! record is indexed into the scoreboard but not committed; the opaque
//! type id is parked in `last_aggregate`. On the next sibling, if it is a
//! typedef or variable whose type equals the parked id, its spelling is
//! adopted as the aggregate's name. Either way the scoreboard commits and
//! the slot clears.

pub mod scoreboard;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::frontend::{
    comp_db, AstTypeId, CompileArgs, Cursor, CursorId, CursorKind, Frontend, TranslationUnit,
};
use crate::records::{FileId, NameKind, SourceLoc, TypeEntry, TypeId, TypeKind, UseKind};
use crate::store::{self, RecordStore};
use scoreboard::{Scoreboard, StagedMember, StagedName, StagedTypeUse};

/// What kind of input path the indexer was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A single `.c` file, compiled with default arguments.
    SourceFile,
    /// The parent directory of a `compile_commands.json`.
    CompDb,
}

/// Which store backend to index into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Durable SQLite database at the given path.
    Sql(PathBuf),
    /// Discard everything (dry run).
    Nop,
    /// In-memory store.
    Mem,
}

#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub input: PathBuf,
    pub input_kind: InputKind,
    pub store: StoreConfig,
}

/// Index the project or source file specified by `config`.
pub fn index_project(config: &IndexConfig) -> Result<()> {
    let mut store = match &config.store {
        StoreConfig::Sql(path) => store::open_durable(path, false)
            .with_context(|| format!("cannot open database '{}'", path.display()))?,
        StoreConfig::Nop => store::open_nop(),
        StoreConfig::Mem => store::open_mem(),
    };

    let result = index_with_store(config, store.as_mut());
    store.close().context("cannot close database")?;
    result
}

/// Index into a caller-provided store. Lets tests inspect the store
/// afterwards.
pub fn index_with_store(config: &IndexConfig, store: &mut dyn RecordStore) -> Result<()> {
    let mut frontend = Frontend::new()?;
    let mut ctx = IndexCtx::new(store);

    match config.input_kind {
        InputKind::CompDb => {
            let commands = comp_db::load_compile_commands(&config.input)?;
            info!(
                "loaded comp-db '{}'/compile_commands.json; {} commands",
                config.input.display(),
                commands.len()
            );
            for command in &commands {
                let argv = command.argv();
                let args = comp_db::parse_compile_args(&argv, &command.directory);
                let source = command.source_path();
                ctx.index_target(&mut frontend, &source, &args)?;
                // pointers into the AST aren't meaningful between TUs
                ctx.reset_tu();
            }
        }
        InputKind::SourceFile => {
            let argv = comp_db::default_argv();
            let args = comp_db::parse_compile_args(&argv, &config.input);
            ctx.index_target(&mut frontend, &config.input, &args)?;
        }
    }

    Ok(())
}

/// State tracked while indexing. Most members are specific to a TU and
/// are reset between TUs; the store and its contents persist.
struct IndexCtx<'db> {
    store: &'db mut dyn RecordStore,
    /// Durable reference per TU file, aligned with
    /// [`TranslationUnit::files`].
    file_refs: Vec<FileId>,
    /// Opaque type id -> durable id for everything committed so far in
    /// this TU.
    type_map: HashMap<AstTypeId, TypeId>,
    /// Source location of the current cursor.
    loc: SourceLoc,
    sb: Scoreboard,
    /// The opaque id of the last indexed aggregate, set only when it is
    /// unnamed and the next sibling may carry its name.
    last_aggregate: Option<AstTypeId>,
    node_count: u32,
}

impl<'db> IndexCtx<'db> {
    fn new(store: &'db mut dyn RecordStore) -> Self {
        IndexCtx {
            store,
            file_refs: Vec::new(),
            type_map: HashMap::new(),
            loc: SourceLoc::default(),
            sb: Scoreboard::new(),
            last_aggregate: None,
            node_count: 0,
        }
    }

    fn reset_tu(&mut self) {
        self.file_refs.clear();
        self.type_map.clear();
        self.loc = SourceLoc::default();
        self.last_aggregate = None;
        self.node_count = 0;
    }

    /// Compile one target and index it.
    fn index_target(
        &mut self,
        frontend: &mut Frontend,
        source: &std::path::Path,
        args: &CompileArgs,
    ) -> Result<()> {
        let tu = frontend
            .parse_tu(source, args)
            .with_context(|| format!("cannot make TU from '{}'", source.display()))?;
        info!(
            "made TU for '{}'; {} files, {} cursors",
            source.display(),
            tu.files.len(),
            tu.cursors.len()
        );

        self.index_includes(&tu)
            .context("failed to index includes")?;
        self.index_tu(&tu)?;
        Ok(())
    }

    /// Assign a durable file reference to every file of the include
    /// closure. All of a TU's cursors point at files enumerated here.
    fn index_includes(&mut self, tu: &TranslationUnit) -> Result<()> {
        for path in &tu.files {
            let file_ref = self
                .store
                .add_file(path)
                .with_context(|| format!("cannot add file '{}'", path.display()))?;
            debug!("map file '{}' -> {}", path.display(), file_ref.0);
            self.file_refs.push(file_ref);
        }
        Ok(())
    }

    /// Walk all top-level cursors of `tu`.
    fn index_tu(&mut self, tu: &TranslationUnit) -> Result<()> {
        debug!("starting iteration over {} roots", tu.roots.len());

        for &root in &tu.roots {
            self.index_ast_node(tu, root)?;
        }

        // an unnamed aggregate at the very end of the TU never sees a
        // next sibling; flush it so its nested named types still commit
        if self.last_aggregate.is_some() {
            self.commit_pending()?;
        }

        debug!("iteration complete, visited {} nodes", self.node_count);
        Ok(())
    }

    /// Handle one top-level cursor.
    ///
    /// Only recoverable errors are swallowed (logged, node skipped);
    /// fatal store errors propagate and abort the run.
    fn index_ast_node(&mut self, tu: &TranslationUnit, id: CursorId) -> StoreResult<()> {
        let cursor = &tu.cursors[id];
        self.node_count += 1;

        if !self.cursor_is_indexable(cursor) {
            return Ok(());
        }

        if !self.update_location(cursor) {
            // no file reference; reported in update_location
            return Ok(());
        }

        // check whether the node after an unnamed aggregate is its name
        if self.last_aggregate.is_some() {
            let consumed = self.adopt_aggregate_name(cursor);
            // commit and reset regardless of whether a name was adopted
            self.commit_pending()?;
            if consumed {
                return Ok(());
            }
            // not a name; index the node like normal
        }

        match cursor.kind {
            CursorKind::StructDecl | CursorKind::UnionDecl | CursorKind::EnumDecl => {
                if self.index_aggregate(tu, id)? {
                    self.last_aggregate = tu.cursors[id].type_id;
                    debug!("look for aggregate {:?} name next node", self.last_aggregate);
                }
            }
            CursorKind::TypedefDecl => self.index_typedef(cursor)?,
            // field decls aren't allowed at global scope; functions,
            // variables and enum constants are unimplemented here
            _ => {}
        }
        Ok(())
    }

    /// Coarse filter for top-level cursors. Sub-indexing functions have
    /// more context on whether a node is indexable.
    fn cursor_is_indexable(&self, cursor: &Cursor) -> bool {
        match cursor.kind {
            CursorKind::StructDecl | CursorKind::UnionDecl | CursorKind::EnumDecl => {
                // incomplete types are unimplemented
                cursor.complete
            }
            // typedefs and variables of non-aggregate types aren't worth
            // indexing
            CursorKind::TypedefDecl => cursor.type_id.is_some(),
            CursorKind::VarDecl => cursor.type_id.is_some(),
            _ => false,
        }
    }

    /// Update `self.loc` to the source location of `cursor`. Returns
    /// false (and reports) when the cursor's file was never enumerated.
    fn update_location(&mut self, cursor: &Cursor) -> bool {
        let Some(&file_ref) = self.file_refs.get(cursor.file) else {
            // all files in a TU should have been seen in index_includes
            error!("no file entry for cursor file index {}", cursor.file);
            return false;
        };

        if self.loc.file != file_ref {
            debug!("file changed from {} to {}", self.loc.file.0, file_ref.0);
            self.loc.file = file_ref;
        }

        // function and scope can't change at global scope
        self.loc.line = cursor.line;
        self.loc.column = cursor.column;
        true
    }

    /// Commit the pending scoreboard and clear the lookahead slot.
    fn commit_pending(&mut self) -> StoreResult<()> {
        let result = self.sb.commit(&mut *self.store, &mut self.type_map);
        self.sb.reset();
        self.last_aggregate = None;
        result
    }

    /// Try to index `cursor` as the name of the uncommitted aggregate.
    /// True when it was consumed.
    fn adopt_aggregate_name(&mut self, cursor: &Cursor) -> bool {
        let last = self.last_aggregate.expect("lookahead slot is set");

        let name_kind = match cursor.kind {
            CursorKind::VarDecl => NameKind::Var,
            CursorKind::TypedefDecl => NameKind::Typedef,
            _ => {
                // an unnamed aggregate must be followed by a typedef or a
                // variable to declare anything
                warn!("bad code: aggregate {:?} does not declare anything", last);
                return false;
            }
        };

        if cursor.type_id != Some(last) {
            warn!(
                "expected var/typedef decl for {:?}, got {:?}",
                last, cursor.type_id
            );
            return false;
        }

        self.sb.loc = self.loc;
        self.sb.add_name(last, name_kind, cursor.spelling.clone());
        true
    }

    /// Index an aggregate declaration and its children through the
    /// scoreboard.
    ///
    /// Returns true when the aggregate is unnamed and the caller should
    /// treat the next sibling as a potential name; the scoreboard is left
    /// pending in that case. Named aggregates commit before returning.
    fn index_aggregate(&mut self, tu: &TranslationUnit, id: CursorId) -> StoreResult<bool> {
        assert!(self.sb.is_empty(), "scoreboard in use on aggregate entry");

        let cursor = &tu.cursors[id];
        let type_id = cursor.type_id.expect("complete aggregate has a type id");

        self.sb.loc = self.loc;
        self.stage_aggregate_record(cursor);
        self.walk_aggregate_children(tu, id);

        assert!(!self.sb.new_types.is_empty());
        assert_eq!(self.sb.new_types[0].type_id, type_id);

        if self.sb.unnamed.contains_key(&type_id) {
            // unnamed; leave the scoreboard pending for the lookahead
            return Ok(true);
        }
        self.commit_pending()?;
        Ok(false)
    }

    /// Stage the type record for one aggregate cursor.
    ///
    /// Three cases for the name:
    /// - direct: the tag becomes the staged typename;
    /// - unnamed: staged without a name and enrolled for late naming;
    /// - anonymous: not staged at all - only valid nested inside another
    ///   aggregate, whose current-parent entry absorbs the fields.
    fn stage_aggregate_record(&mut self, cursor: &Cursor) {
        let type_id = cursor.type_id.expect("aggregate definitions carry a type id");

        let mut entry = TypeEntry {
            kind: aggregate_type_kind(cursor.kind),
            complete: cursor.complete,
        };
        if !entry.complete {
            // incomplete aggregates aren't supported; even if the type is
            // later completed, its members won't be updated
            warn!("incomplete aggregates aren't supported");
            entry.complete = true;
        }

        if cursor.anonymous {
            debug!("anonymous record {:?}, not staged", type_id);
            assert!(
                !self.sb.current_parents.is_empty(),
                "anonymous record outside an aggregate"
            );
            return;
        }

        let name = if cursor.spelling.is_empty() {
            None
        } else {
            // named aggregates reuse the record location for the name
            Some(StagedName {
                kind: NameKind::Direct,
                name: cursor.spelling.clone(),
                loc: self.sb.loc,
            })
        };

        debug!(
            "index {} record {:?}, named {}",
            entry.kind.as_str(),
            type_id,
            name.is_some()
        );
        self.sb.stage_type(type_id, entry, name);
    }

    /// Recursively index the children of an aggregate.
    ///
    /// The current-parent stack tracks the nearest *named* ancestor:
    /// named nested aggregates push around their subtree, anonymous ones
    /// don't, so their fields are attributed to the named ancestor.
    fn walk_aggregate_children(&mut self, tu: &TranslationUnit, id: CursorId) {
        let type_id = tu.cursors[id].type_id.expect("aggregate has a type id");
        self.sb.current_parents.push(type_id);
        self.visit_children(tu, id);
        self.sb.current_parents.pop();
    }

    fn visit_children(&mut self, tu: &TranslationUnit, parent: CursorId) {
        let children = tu.cursors[parent].children.clone();
        for child_id in children {
            let child = &tu.cursors[child_id];
            self.node_count += 1;
            if !self.update_location(child) {
                continue;
            }
            self.sb.loc = self.loc;

            let recurse = self.index_aggregate_child(tu, child_id);
            if recurse {
                let child = &tu.cursors[child_id];
                let named_parent = is_aggregate_kind(child.kind) && !child.anonymous;
                if named_parent {
                    self.sb
                        .current_parents
                        .push(child.type_id.expect("aggregate has a type id"));
                }
                self.visit_children(tu, child_id);
                if named_parent {
                    self.sb.current_parents.pop();
                }
            }
        }
    }

    /// Handle one child of an aggregate. Returns true to recurse into its
    /// children.
    fn index_aggregate_child(&mut self, tu: &TranslationUnit, id: CursorId) -> bool {
        let cursor = &tu.cursors[id];
        match cursor.kind {
            // nested types: stage the record now, collect members on the
            // recursion
            CursorKind::StructDecl | CursorKind::UnionDecl => {
                self.stage_aggregate_record(cursor);
                true
            }
            CursorKind::EnumDecl | CursorKind::EnumConstantDecl => {
                debug!("nested enums unimplemented");
                false
            }
            CursorKind::FieldDecl => {
                let parent = *self
                    .sb
                    .current_parents
                    .last()
                    .expect("field outside an aggregate");
                self.index_member(cursor, parent);
                false
            }
            // typedefs and functions aren't allowed nested under a type
            _ => false,
        }
    }

    /// Index a single member. Generates up to three records: the member
    /// itself, a `var` typename when the member names an unnamed
    /// aggregate, and a `decl` type use when the member's type is an
    /// aggregate.
    fn index_member(&mut self, cursor: &Cursor, parent: AstTypeId) {
        self.sb.members.push(StagedMember {
            parent,
            base_type: cursor.type_id,
            name: cursor.spelling.clone(),
            loc: self.sb.loc,
        });
        debug!(
            "index member '{}', type {:?}, parent {:?}",
            cursor.spelling, cursor.type_id, parent
        );

        let Some(base_type) = cursor.type_id else {
            // primitive member; nothing else to record
            return;
        };

        // a member declared directly (not through a pointer) of an
        // unnamed aggregate supplies its name
        if !cursor.pointer && self.sb.unnamed.contains_key(&base_type) {
            self.sb
                .add_name(base_type, NameKind::Var, cursor.spelling.clone());
        }

        self.sb.type_uses.push(StagedTypeUse {
            enclosing: parent,
            base_type,
            kind: UseKind::Decl,
            loc: self.sb.loc,
        });
        debug!("index type-use of {:?} within {:?}", base_type, parent);
    }

    /// Index a typedef cursor.
    ///
    /// The underlying type must already be in the TU type map (its
    /// declaration was indexed earlier); a miss means a typedef of an
    /// incomplete or never-indexed type and is skipped silently.
    fn index_typedef(&mut self, cursor: &Cursor) -> StoreResult<()> {
        let underlying = cursor.type_id.expect("filter admits aggregate typedefs only");

        let Some(&base_type) = self.type_map.get(&underlying) else {
            debug!("cannot find type ref for {:?}", underlying);
            return Ok(());
        };

        let entry = crate::records::TypenameEntry {
            kind: NameKind::Typedef,
            base_type,
            name: cursor.spelling.clone(),
        };

        match self.store.typename_lookup(&self.loc, &entry) {
            Ok(preexisting) => {
                if preexisting != base_type {
                    // somehow found `typedef A foo_t` vs `typedef B foo_t`;
                    // keep the old record
                    error!(
                        "corrupt: mismatched typedef '{}', old {}, new {}",
                        cursor.spelling, base_type.0, preexisting.0
                    );
                }
                return Ok(());
            }
            Err(StoreError::NotFound) => {}
            Err(e) => {
                if e.is_fatal() {
                    return Err(e);
                }
                error!("cannot look up typename '{}': {}", cursor.spelling, e);
                return Ok(());
            }
        }

        if let Err(e) = self.store.typename_insert(&self.loc, &entry) {
            if e.is_fatal() {
                return Err(e);
            }
            error!("can't persist typedef '{}': {}", cursor.spelling, e);
            return Ok(());
        }

        debug!("added typedef '{}' -> {}", cursor.spelling, base_type.0);
        Ok(())
    }
}

fn aggregate_type_kind(kind: CursorKind) -> TypeKind {
    match kind {
        CursorKind::StructDecl => TypeKind::Struct,
        CursorKind::UnionDecl => TypeKind::Union,
        CursorKind::EnumDecl => TypeKind::Enum,
        other => panic!("not a tag cursor kind: {:?}", other),
    }
}

fn is_aggregate_kind(kind: CursorKind) -> bool {
    matches!(
        kind,
        CursorKind::StructDecl | CursorKind::UnionDecl | CursorKind::EnumDecl
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::TypenameEntry;
    use crate::store::mem::MemStore;

    /// Index C source through the real frontend lowering into a fresh
    /// in-memory store.
    fn index_source(source: &str) -> MemStore {
        let mut db = MemStore::new();
        index_sources_into(&[("test.c", source)], &mut db);
        db
    }

    fn index_sources_into(sources: &[(&str, &str)], db: &mut MemStore) {
        let mut frontend = Frontend::new().unwrap();
        let tu = frontend.parse_tu_from_sources(sources);
        let mut ctx = IndexCtx::new(db);
        // stand-in for index_includes: mem add_file never fails
        for path in &tu.files {
            let file_ref = ctx.store.add_file(path).unwrap();
            ctx.file_refs.push(file_ref);
        }
        ctx.index_tu(&tu).unwrap();
    }

    fn typename<'a>(db: &'a MemStore, name: &str) -> &'a (TypenameEntry, SourceLoc) {
        db.typenames()
            .iter()
            .find(|(entry, _)| entry.name == name)
            .unwrap_or_else(|| panic!("no typename '{}'", name))
    }

    #[test]
    fn named_struct_produces_type_typename_member() {
        let db = index_source("struct foo { int a; };\n");

        assert_eq!(db.type_count(), 1);
        assert_eq!(db.typenames().len(), 1);
        assert_eq!(db.member_count(), 1);
        assert_eq!(db.type_use_count(), 0);

        let (name, loc) = typename(&db, "foo");
        assert_eq!(name.kind, NameKind::Direct);
        assert_eq!((loc.line, loc.column), (1, 1));

        let (member, mloc) = &db.members()[0];
        assert_eq!(member.name, "a");
        assert_eq!(member.base_type, None);
        assert_eq!((mloc.line, mloc.column), (1, 14));
    }

    #[test]
    fn typedef_names_unnamed_struct() {
        let db = index_source("typedef struct { int a; } foo_t;\n");

        assert_eq!(db.type_count(), 1);
        let (name, loc) = typename(&db, "foo_t");
        assert_eq!(name.kind, NameKind::Typedef);
        assert_eq!((loc.line, loc.column), (1, 27));

        assert_eq!(db.member_count(), 1);
        assert_eq!(db.members()[0].0.name, "a");
    }

    #[test]
    fn var_names_unnamed_struct() {
        let db = index_source("struct { int x; } v;\n");

        assert_eq!(db.type_count(), 1);
        let (name, _) = typename(&db, "v");
        assert_eq!(name.kind, NameKind::Var);
    }

    #[test]
    fn bare_unnamed_struct_is_discarded() {
        let db = index_source("struct { int x; };\n");

        assert_eq!(db.type_count(), 0);
        assert_eq!(db.typenames().len(), 0);
        assert_eq!(db.member_count(), 0);
    }

    #[test]
    fn bare_unnamed_struct_keeps_nested_named_types() {
        let db = index_source("struct { struct global { int a; }; int garbage; };\n");

        // the outer unnamed struct is dropped, `struct global` survives
        assert_eq!(db.type_count(), 1);
        let (name, _) = typename(&db, "global");
        assert_eq!(name.kind, NameKind::Direct);
        // `a` belongs to global; `garbage` belonged to the dropped outer
        assert_eq!(db.member_count(), 1);
        assert_eq!(db.members()[0].0.name, "a");
    }

    #[test]
    fn anonymous_member_fields_attribute_to_named_ancestor() {
        let db = index_source("struct bar { struct { int x; }; int y; };\n");

        assert_eq!(db.type_count(), 1);
        assert_eq!(db.member_count(), 2);

        let bar = typename(&db, "bar").0.base_type;
        for (member, _) in db.members() {
            assert_eq!(member.parent, bar);
        }
    }

    #[test]
    fn unnamed_member_struct_adopts_field_name() {
        let db = index_source("struct bar { struct { int x; } u; };\n");

        assert_eq!(db.type_count(), 2);
        let bar = typename(&db, "bar").0.base_type;
        let inner = typename(&db, "u");
        assert_eq!(inner.0.kind, NameKind::Var);

        // x belongs to the inner struct, u to bar with base = inner
        let x = db.members().iter().find(|(m, _)| m.name == "x").unwrap();
        assert_eq!(x.0.parent, inner.0.base_type);
        let u = db.members().iter().find(|(m, _)| m.name == "u").unwrap();
        assert_eq!(u.0.parent, bar);
        assert_eq!(u.0.base_type, Some(inner.0.base_type));
    }

    #[test]
    fn nested_named_struct_emits_type_use() {
        let db = index_source("struct outer { struct inner { int a; } i; };\n");

        assert_eq!(db.type_count(), 2);
        assert_eq!(db.member_count(), 2);
        assert_eq!(db.type_use_count(), 1);

        let outer = typename(&db, "outer").0.base_type;
        let inner = typename(&db, "inner").0.base_type;

        let i = db.members().iter().find(|(m, _)| m.name == "i").unwrap();
        assert_eq!(i.0.parent, outer);
        assert_eq!(i.0.base_type, Some(inner));

        let a = db.members().iter().find(|(m, _)| m.name == "a").unwrap();
        assert_eq!(a.0.parent, inner);
        assert_eq!(a.0.base_type, None);
    }

    #[test]
    fn self_referential_struct_resolves_member_base() {
        let db = index_source("struct s { struct s *next; };\n");

        assert_eq!(db.type_count(), 1);
        let s = typename(&db, "s").0.base_type;
        let next = &db.members()[0].0;
        assert_eq!(next.parent, s);
        assert_eq!(next.base_type, Some(s));
    }

    #[test]
    fn typedef_of_named_struct_adds_second_typename() {
        let db = index_source("struct foo { int a; };\ntypedef struct foo foo_t;\n");

        assert_eq!(db.type_count(), 1);
        assert_eq!(db.typenames().len(), 2);
        let direct = typename(&db, "foo");
        let td = typename(&db, "foo_t");
        assert_eq!(td.0.kind, NameKind::Typedef);
        assert_eq!(td.0.base_type, direct.0.base_type);
    }

    #[test]
    fn typedef_of_primitive_is_skipped() {
        let db = index_source("typedef int myint;\n");
        assert_eq!(db.typenames().len(), 0);
    }

    #[test]
    fn unnamed_struct_at_end_of_file_is_flushed() {
        // no next sibling for the lookahead; nested named type must
        // still commit
        let db = index_source("struct { struct tail { int t; }; };");
        assert_eq!(db.type_count(), 1);
        assert_eq!(typename(&db, "tail").0.kind, NameKind::Direct);
    }

    #[test]
    fn empty_struct_has_no_members() {
        let db = index_source("struct foo {};\n");
        assert_eq!(db.type_count(), 1);
        assert_eq!(db.typenames().len(), 1);
        assert_eq!(db.member_count(), 0);
        assert_eq!(db.type_use_count(), 0);
    }

    #[test]
    fn enum_indexes_without_constants() {
        let db = index_source("enum color { RED, GREEN };\n");
        assert_eq!(db.type_count(), 1);
        let (name, _) = typename(&db, "color");
        assert_eq!(name.kind, NameKind::Direct);
        // enum constants are unimplemented
        assert_eq!(db.member_count(), 0);
    }

    #[test]
    fn forward_declaration_is_skipped() {
        let db = index_source("struct foo;\n");
        assert_eq!(db.type_count(), 0);
    }
}

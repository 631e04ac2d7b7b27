//! C frontend: turns source files into the cursor stream the indexer walks.
//!
//! Parsing is tree-sitter-c. This module lowers the parse tree of every
//! file in a translation unit's include closure into a flat arena of
//! cursors with the shape the translator is written against:
//!
//! - declaration kinds are classified (struct/union/enum decl, typedef,
//!   var, field, enum constant);
//! - every aggregate definition is assigned an opaque per-TU type identity
//!   ([`AstTypeId`]); type references resolve to the same identity through
//!   the tag and typedef namespaces and through pointer/array declarators;
//! - `typedef struct {...} x;` and `struct {...} x;` are flattened into an
//!   aggregate cursor followed by a typedef/var cursor, so a declarator
//!   that names an unnamed aggregate is the *next sibling* of the
//!   aggregate - the order the translator's lookahead expects.
//!
//! Positions are 1-indexed lines and columns. Aggregate cursors sit at the
//! start of the specifier, field cursors at the start of the declaration,
//! typedef/var cursors at the declared name.

pub mod comp_db;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;
use tree_sitter::{Node, Tree};

pub use comp_db::CompileArgs;

/// Index of a cursor in its translation unit's arena.
pub type CursorId = usize;

/// Opaque per-TU identity of a canonical C type.
///
/// Not stable across translation units; the indexer maps these to durable
/// ids and clears the map between TUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AstTypeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    StructDecl,
    UnionDecl,
    EnumDecl,
    TypedefDecl,
    VarDecl,
    FieldDecl,
    EnumConstantDecl,
}

/// One node of the cursor stream.
#[derive(Debug, Clone)]
pub struct Cursor {
    pub kind: CursorKind,
    /// Tag name for aggregates (empty when there is none), declared name
    /// for typedef/var/field/enum-constant cursors.
    pub spelling: String,
    /// Canonical type identity: the declared type for aggregates, the
    /// underlying type for typedefs, the entity's type for var and field
    /// cursors. `None` for primitives and unresolved references, and for
    /// typedef/var cursors whose declarator goes through a pointer.
    pub type_id: Option<AstTypeId>,
    /// C11 anonymous member record: no tag, no declarator, nested in an
    /// aggregate.
    pub anonymous: bool,
    /// Field cursors: the declarator goes through a pointer.
    pub pointer: bool,
    /// Aggregate cursors: the declaration has a body.
    pub complete: bool,
    /// Index into [`TranslationUnit::files`].
    pub file: usize,
    pub line: u32,
    pub column: u32,
    pub children: Vec<CursorId>,
}

/// One parsed translation unit: the include closure plus the cursor arena.
#[derive(Debug)]
pub struct TranslationUnit {
    /// Files of the include closure, headers before their includer; the
    /// root source file is last.
    pub files: Vec<PathBuf>,
    pub cursors: Vec<Cursor>,
    /// Top-level cursors across all files, in emission order.
    pub roots: Vec<CursorId>,
}

#[derive(Debug)]
struct ParsedFile {
    path: PathBuf,
    source: String,
    tree: Tree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum IncludePath {
    Quoted(String),
    Angle(String),
}

pub struct Frontend {
    parser: tree_sitter::Parser,
}

impl Frontend {
    pub fn new() -> Result<Self> {
        let mut parser = tree_sitter::Parser::new();
        parser.set_language(&tree_sitter_c::language())?;
        Ok(Frontend { parser })
    }

    /// Parse `root` and everything it includes into one translation unit.
    pub fn parse_tu(&mut self, root: &Path, args: &CompileArgs) -> Result<TranslationUnit> {
        let mut seen = HashSet::new();
        let mut parsed = Vec::new();
        self.visit_file(root, args, &mut seen, &mut parsed, true)?;
        Ok(lower(&parsed))
    }

    /// Depth-first include traversal; a file's headers land in `out`
    /// before the file itself, and each file is parsed once per TU.
    fn visit_file(
        &mut self,
        path: &Path,
        args: &CompileArgs,
        seen: &mut HashSet<PathBuf>,
        out: &mut Vec<ParsedFile>,
        required: bool,
    ) -> Result<()> {
        let canon = match std::fs::canonicalize(path) {
            Ok(canon) => canon,
            Err(e) if required => {
                return Err(e).with_context(|| format!("cannot open '{}'", path.display()));
            }
            Err(e) => {
                debug!("skipping unreadable include '{}': {}", path.display(), e);
                return Ok(());
            }
        };
        if !seen.insert(canon.clone()) {
            return Ok(());
        }

        let bytes = std::fs::read(&canon)
            .with_context(|| format!("cannot read '{}'", canon.display()))?;
        let source = String::from_utf8_lossy(&bytes).into_owned();
        let tree = self
            .parser
            .parse(&source, None)
            .ok_or_else(|| anyhow!("cannot parse '{}'", canon.display()))?;

        let includes = find_includes(&tree, &source);
        let dir = canon.parent().map(Path::to_path_buf).unwrap_or_default();
        for include in includes {
            match resolve_include(&include, &dir, &args.include_dirs) {
                Some(target) => self.visit_file(&target, args, seen, out, false)?,
                None => debug!("cannot resolve include {:?}", include),
            }
        }

        out.push(ParsedFile {
            path: canon,
            source,
            tree,
        });
        Ok(())
    }

    /// Build a TU straight from in-memory sources. Test scaffolding for
    /// the lowering and the indexer; include processing is bypassed.
    #[cfg(test)]
    pub(crate) fn parse_tu_from_sources(&mut self, sources: &[(&str, &str)]) -> TranslationUnit {
        let parsed: Vec<ParsedFile> = sources
            .iter()
            .map(|(path, source)| ParsedFile {
                path: PathBuf::from(path),
                source: source.to_string(),
                tree: self.parser.parse(source, None).expect("test source parses"),
            })
            .collect();
        lower(&parsed)
    }
}

/// Recursively collect `#include` directives of one file.
fn find_includes(tree: &Tree, source: &str) -> Vec<IncludePath> {
    fn walk(node: Node, source: &str, out: &mut Vec<IncludePath>) {
        if node.kind() == "preproc_include" {
            if let Some(path) = node.child_by_field_name("path") {
                let text = path.utf8_text(source.as_bytes()).unwrap_or("");
                match path.kind() {
                    "string_literal" => {
                        out.push(IncludePath::Quoted(text.trim_matches('"').to_string()));
                    }
                    "system_lib_string" => {
                        let trimmed = text.trim_start_matches('<').trim_end_matches('>');
                        out.push(IncludePath::Angle(trimmed.to_string()));
                    }
                    _ => {}
                }
            }
            return;
        }
        let mut walker = node.walk();
        for child in node.named_children(&mut walker) {
            walk(child, source, out);
        }
    }

    let mut out = Vec::new();
    walk(tree.root_node(), source, &mut out);
    out
}

/// Resolve an include to a file path.
///
/// Quoted includes try the including file's directory first, then the
/// `-I` directories; angle includes only the `-I` directories. Unresolved
/// includes (system headers outside the search path) are skipped by the
/// caller.
fn resolve_include(
    include: &IncludePath,
    including_dir: &Path,
    include_dirs: &[PathBuf],
) -> Option<PathBuf> {
    let (name, try_local) = match include {
        IncludePath::Quoted(name) => (name, true),
        IncludePath::Angle(name) => (name, false),
    };

    if try_local {
        let local = including_dir.join(name);
        if local.is_file() {
            return Some(local);
        }
    }
    for dir in include_dirs {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

fn is_aggregate_specifier(kind: &str) -> bool {
    matches!(
        kind,
        "struct_specifier" | "union_specifier" | "enum_specifier"
    )
}

/// What a declarator declares: the name node, and whether the chain goes
/// through a pointer or a function declarator on the way there.
struct DeclaratorInfo<'t> {
    name: Option<Node<'t>>,
    pointer: bool,
    function: bool,
}

fn declarator_info(node: Node) -> DeclaratorInfo {
    let mut info = DeclaratorInfo {
        name: None,
        pointer: false,
        function: false,
    };
    let mut current = Some(node);
    while let Some(n) = current {
        match n.kind() {
            "identifier" | "field_identifier" | "type_identifier" => {
                info.name = Some(n);
                break;
            }
            "pointer_declarator" | "pointer_type_declarator" => {
                info.pointer = true;
                current = n.child_by_field_name("declarator");
            }
            "function_declarator" | "function_type_declarator" => {
                info.function = true;
                current = n.child_by_field_name("declarator");
            }
            "parenthesized_declarator" | "parenthesized_type_declarator" => {
                current = n.child_by_field_name("declarator").or_else(|| n.named_child(0));
            }
            _ => {
                // array/init/attributed declarators all nest the real one
                current = n.child_by_field_name("declarator");
            }
        }
    }
    info
}

struct Lowerer<'a> {
    files: &'a [ParsedFile],
    cursors: Vec<Cursor>,
    roots: Vec<CursorId>,
    next_type_id: u64,
    /// C tag namespace: `struct foo`/`union foo`/`enum foo` share it.
    tags: HashMap<String, AstTypeId>,
    /// Typedef names that resolve to an aggregate.
    typedefs: HashMap<String, AstTypeId>,
}

fn lower(files: &[ParsedFile]) -> TranslationUnit {
    let mut lowerer = Lowerer {
        files,
        cursors: Vec::new(),
        roots: Vec::new(),
        next_type_id: 1,
        tags: HashMap::new(),
        typedefs: HashMap::new(),
    };

    for file_index in 0..files.len() {
        let root = files[file_index].tree.root_node();
        let mut walker = root.walk();
        let children: Vec<Node> = root.named_children(&mut walker).collect();
        for node in children {
            lowerer.lower_top(file_index, node);
        }
    }

    TranslationUnit {
        files: files.iter().map(|f| f.path.clone()).collect(),
        cursors: lowerer.cursors,
        roots: lowerer.roots,
    }
}

impl<'a> Lowerer<'a> {
    fn text(&self, file: usize, node: Node) -> String {
        node.utf8_text(self.files[file].source.as_bytes())
            .unwrap_or("")
            .to_string()
    }

    fn fresh_type_id(&mut self) -> AstTypeId {
        let id = AstTypeId(self.next_type_id);
        self.next_type_id += 1;
        id
    }

    fn push(&mut self, cursor: Cursor) -> CursorId {
        self.cursors.push(cursor);
        self.cursors.len() - 1
    }

    fn lower_top(&mut self, file: usize, node: Node) {
        match node.kind() {
            "struct_specifier" | "union_specifier" | "enum_specifier" => {
                let id = self.lower_aggregate(file, node, false);
                self.roots.push(id);
            }
            "declaration" => self.lower_declaration(file, node, CursorKind::VarDecl),
            "type_definition" => self.lower_declaration(file, node, CursorKind::TypedefDecl),
            // conditional blocks still carry declarations
            "preproc_ifdef" | "preproc_if" | "preproc_else" | "preproc_elif" => {
                let mut walker = node.walk();
                let children: Vec<Node> = node.named_children(&mut walker).collect();
                for child in children {
                    self.lower_top(file, child);
                }
            }
            _ => {}
        }
    }

    /// Lower a `declaration` or `type_definition`: an optional aggregate
    /// definition cursor followed by one var/typedef cursor per
    /// declarator.
    fn lower_declaration(&mut self, file: usize, node: Node, decl_kind: CursorKind) {
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };
        let mut walker = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut walker)
            .collect();

        let is_definition =
            is_aggregate_specifier(type_node.kind()) && type_node.child_by_field_name("body").is_some();

        let base = if is_definition {
            let aggregate = self.lower_aggregate(file, type_node, false);
            self.roots.push(aggregate);
            self.cursors[aggregate].type_id
        } else if is_aggregate_specifier(type_node.kind()) && declarators.is_empty() {
            // forward declaration: `struct foo;`
            let aggregate = self.lower_aggregate(file, type_node, false);
            self.roots.push(aggregate);
            return;
        } else {
            self.resolve_type_ref(file, type_node)
        };

        for declarator in declarators {
            let info = declarator_info(declarator);
            let Some(name_node) = info.name else { continue };
            if info.function {
                // function declarations aren't indexed
                continue;
            }
            let spelling = self.text(file, name_node);
            let type_id = if info.pointer { None } else { base };
            let pos = name_node.start_position();
            let id = self.push(Cursor {
                kind: decl_kind,
                spelling: spelling.clone(),
                type_id,
                anonymous: false,
                pointer: info.pointer,
                complete: false,
                file,
                line: pos.row as u32 + 1,
                column: pos.column as u32 + 1,
                children: Vec::new(),
            });
            self.roots.push(id);

            if decl_kind == CursorKind::TypedefDecl {
                if let Some(underlying) = type_id {
                    self.typedefs.insert(spelling, underlying);
                }
            }
        }
    }

    /// Lower a struct/union/enum specifier.
    ///
    /// With a body this is a definition: a fresh type identity is
    /// allocated, the tag (if any) is registered, and the body is lowered
    /// into child cursors. Without a body it is a reference or forward
    /// declaration resolved through the tag namespace.
    fn lower_aggregate(&mut self, file: usize, node: Node, anonymous_candidate: bool) -> CursorId {
        let kind = match node.kind() {
            "struct_specifier" => CursorKind::StructDecl,
            "union_specifier" => CursorKind::UnionDecl,
            "enum_specifier" => CursorKind::EnumDecl,
            other => unreachable!("not an aggregate specifier: {}", other),
        };
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(file, n));
        let pos = node.start_position();

        let Some(body) = node.child_by_field_name("body") else {
            let type_id = name.as_deref().and_then(|n| self.tags.get(n)).copied();
            return self.push(Cursor {
                kind,
                spelling: name.unwrap_or_default(),
                type_id,
                anonymous: false,
                pointer: false,
                complete: false,
                file,
                line: pos.row as u32 + 1,
                column: pos.column as u32 + 1,
                children: Vec::new(),
            });
        };

        let type_id = self.fresh_type_id();
        if let Some(name) = &name {
            // C rule: a nested tag lands in the enclosing ordinary scope
            self.tags.insert(name.clone(), type_id);
        }
        let anonymous = name.is_none() && anonymous_candidate;

        let mut children = Vec::new();
        let mut walker = body.walk();
        let items: Vec<Node> = body.named_children(&mut walker).collect();
        for item in items {
            match item.kind() {
                "field_declaration" => self.lower_field(file, item, &mut children),
                "enumerator" => {
                    let id = self.lower_enumerator(file, item);
                    children.push(id);
                }
                _ => {}
            }
        }

        self.push(Cursor {
            kind,
            spelling: name.unwrap_or_default(),
            type_id: Some(type_id),
            anonymous,
            pointer: false,
            complete: true,
            file,
            line: pos.row as u32 + 1,
            column: pos.column as u32 + 1,
            children,
        })
    }

    /// Lower one field declaration: an optional nested aggregate cursor,
    /// then one field cursor per declarator.
    fn lower_field(&mut self, file: usize, node: Node, children_out: &mut Vec<CursorId>) {
        let Some(type_node) = node.child_by_field_name("type") else {
            return;
        };
        let mut walker = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut walker)
            .collect();

        let base = if is_aggregate_specifier(type_node.kind())
            && type_node.child_by_field_name("body").is_some()
        {
            // nested definition; anonymous when no declarator follows
            let aggregate = self.lower_aggregate(file, type_node, declarators.is_empty());
            children_out.push(aggregate);
            self.cursors[aggregate].type_id
        } else {
            self.resolve_type_ref(file, type_node)
        };

        // members are located at the declaration, not the name
        let pos = node.start_position();
        for declarator in declarators {
            let info = declarator_info(declarator);
            let Some(name_node) = info.name else { continue };
            let type_id = if info.function { None } else { base };
            let id = self.push(Cursor {
                kind: CursorKind::FieldDecl,
                spelling: self.text(file, name_node),
                type_id,
                anonymous: false,
                pointer: info.pointer,
                complete: false,
                file,
                line: pos.row as u32 + 1,
                column: pos.column as u32 + 1,
                children: Vec::new(),
            });
            children_out.push(id);
        }
    }

    fn lower_enumerator(&mut self, file: usize, node: Node) -> CursorId {
        let spelling = node
            .child_by_field_name("name")
            .map(|n| self.text(file, n))
            .unwrap_or_default();
        let pos = node.start_position();
        self.push(Cursor {
            kind: CursorKind::EnumConstantDecl,
            spelling,
            type_id: None,
            anonymous: false,
            pointer: false,
            complete: false,
            file,
            line: pos.row as u32 + 1,
            column: pos.column as u32 + 1,
            children: Vec::new(),
        })
    }

    /// Resolve a type *reference* (no body) to a known aggregate identity.
    /// Primitives and unknown names resolve to `None`.
    fn resolve_type_ref(&self, file: usize, type_node: Node) -> Option<AstTypeId> {
        match type_node.kind() {
            "struct_specifier" | "union_specifier" | "enum_specifier" => {
                let name = type_node.child_by_field_name("name")?;
                let name = self.text(file, name);
                self.tags.get(&name).copied()
            }
            "type_identifier" => {
                let name = self.text(file, type_node);
                self.typedefs.get(&name).copied()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tu(source: &str) -> TranslationUnit {
        Frontend::new()
            .unwrap()
            .parse_tu_from_sources(&[("test.c", source)])
    }

    fn root_cursors(tu: &TranslationUnit) -> Vec<&Cursor> {
        tu.roots.iter().map(|&id| &tu.cursors[id]).collect()
    }

    #[test]
    fn named_struct_with_field() {
        let tu = tu("struct foo { int a; };\n");
        let roots = root_cursors(&tu);
        assert_eq!(roots.len(), 1);

        let agg = roots[0];
        assert_eq!(agg.kind, CursorKind::StructDecl);
        assert_eq!(agg.spelling, "foo");
        assert!(agg.complete);
        assert!(!agg.anonymous);
        assert_eq!((agg.line, agg.column), (1, 1));

        assert_eq!(agg.children.len(), 1);
        let field = &tu.cursors[agg.children[0]];
        assert_eq!(field.kind, CursorKind::FieldDecl);
        assert_eq!(field.spelling, "a");
        assert_eq!(field.type_id, None); // primitive
        assert_eq!((field.line, field.column), (1, 14));
    }

    #[test]
    fn typedef_of_unnamed_struct_flattens_to_siblings() {
        let tu = tu("typedef struct { int a; } foo_t;\n");
        let roots = root_cursors(&tu);
        assert_eq!(roots.len(), 2);

        let agg = roots[0];
        assert_eq!(agg.kind, CursorKind::StructDecl);
        assert_eq!(agg.spelling, "");
        assert!(!agg.anonymous);
        assert_eq!((agg.line, agg.column), (1, 9));

        let td = roots[1];
        assert_eq!(td.kind, CursorKind::TypedefDecl);
        assert_eq!(td.spelling, "foo_t");
        assert_eq!(td.type_id, agg.type_id);
        assert_eq!((td.line, td.column), (1, 27));
    }

    #[test]
    fn var_of_unnamed_struct_flattens_to_siblings() {
        let tu = tu("struct { int x; } v;\n");
        let roots = root_cursors(&tu);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].kind, CursorKind::StructDecl);
        assert_eq!(roots[0].spelling, "");
        assert_eq!(roots[1].kind, CursorKind::VarDecl);
        assert_eq!(roots[1].spelling, "v");
        assert_eq!(roots[1].type_id, roots[0].type_id);
    }

    #[test]
    fn anonymous_member_record_is_flagged() {
        let tu = tu("struct bar { struct { int x; }; int y; };\n");
        let roots = root_cursors(&tu);
        assert_eq!(roots.len(), 1);

        let bar = roots[0];
        assert_eq!(bar.children.len(), 2);
        let anon = &tu.cursors[bar.children[0]];
        assert_eq!(anon.kind, CursorKind::StructDecl);
        assert!(anon.anonymous);
        assert_eq!(anon.children.len(), 1);
        assert_eq!(tu.cursors[anon.children[0]].spelling, "x");

        let y = &tu.cursors[bar.children[1]];
        assert_eq!(y.kind, CursorKind::FieldDecl);
        assert_eq!(y.spelling, "y");
    }

    #[test]
    fn unnamed_member_with_declarator_is_not_anonymous() {
        let tu = tu("struct bar { struct { int x; } u; };\n");
        let roots = root_cursors(&tu);
        let bar = roots[0];
        assert_eq!(bar.children.len(), 2);

        let inner = &tu.cursors[bar.children[0]];
        assert_eq!(inner.kind, CursorKind::StructDecl);
        assert!(!inner.anonymous);
        assert_eq!(inner.spelling, "");

        let u = &tu.cursors[bar.children[1]];
        assert_eq!(u.kind, CursorKind::FieldDecl);
        assert_eq!(u.spelling, "u");
        assert_eq!(u.type_id, inner.type_id);
    }

    #[test]
    fn nested_named_struct_resolves_member_type() {
        let tu = tu("struct outer { struct inner { int a; } i; };\n");
        let roots = root_cursors(&tu);
        let outer = roots[0];
        assert_eq!(outer.spelling, "outer");
        assert_eq!(outer.children.len(), 2);

        let inner = &tu.cursors[outer.children[0]];
        assert_eq!(inner.spelling, "inner");
        assert!(inner.complete);

        let i = &tu.cursors[outer.children[1]];
        assert_eq!(i.spelling, "i");
        assert_eq!(i.type_id, inner.type_id);
    }

    #[test]
    fn self_referential_pointer_member_resolves() {
        let tu = tu("struct s { struct s *next; };\n");
        let s = root_cursors(&tu)[0];
        assert_eq!(s.children.len(), 1);
        let next = &tu.cursors[s.children[0]];
        assert_eq!(next.spelling, "next");
        assert!(next.pointer);
        assert_eq!(next.type_id, s.type_id);
    }

    #[test]
    fn typedef_of_named_struct_resolves_underlying() {
        let tu = tu("struct foo { int a; };\ntypedef struct foo foo_t;\n");
        let roots = root_cursors(&tu);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[1].kind, CursorKind::TypedefDecl);
        assert_eq!(roots[1].spelling, "foo_t");
        assert_eq!(roots[1].type_id, roots[0].type_id);
    }

    #[test]
    fn typedef_of_primitive_has_no_type() {
        let tu = tu("typedef int myint;\n");
        let roots = root_cursors(&tu);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind, CursorKind::TypedefDecl);
        assert_eq!(roots[0].type_id, None);
    }

    #[test]
    fn pointer_typedef_has_no_type() {
        let tu = tu("typedef struct { int a; } *foop_t;\n");
        let roots = root_cursors(&tu);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[1].kind, CursorKind::TypedefDecl);
        assert_eq!(roots[1].spelling, "foop_t");
        assert_eq!(roots[1].type_id, None);
    }

    #[test]
    fn forward_declaration_is_incomplete() {
        let tu = tu("struct foo;\n");
        let roots = root_cursors(&tu);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].kind, CursorKind::StructDecl);
        assert!(!roots[0].complete);
    }

    #[test]
    fn enum_with_constants() {
        let tu = tu("enum color { RED, GREEN };\n");
        let roots = root_cursors(&tu);
        let color = roots[0];
        assert_eq!(color.kind, CursorKind::EnumDecl);
        assert_eq!(color.spelling, "color");
        assert_eq!(color.children.len(), 2);
        assert_eq!(tu.cursors[color.children[0]].kind, CursorKind::EnumConstantDecl);
        assert_eq!(tu.cursors[color.children[0]].spelling, "RED");
    }

    #[test]
    fn multiple_declarators_emit_multiple_fields() {
        let tu = tu("struct p { int x, y; };\n");
        let p = root_cursors(&tu)[0];
        assert_eq!(p.children.len(), 2);
        assert_eq!(tu.cursors[p.children[0]].spelling, "x");
        assert_eq!(tu.cursors[p.children[1]].spelling, "y");
    }

    #[test]
    fn var_of_named_struct_resolves() {
        let tu = tu("struct foo { int a; };\nstruct foo g;\n");
        let roots = root_cursors(&tu);
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[1].kind, CursorKind::VarDecl);
        assert_eq!(roots[1].spelling, "g");
        assert_eq!(roots[1].type_id, roots[0].type_id);
    }
}

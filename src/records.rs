//! Record types stored in the database.
//!
//! The indexer builds instances of these types and hands them to a record
//! store backend to persist. The query side reads them back.
//!
//! # Position conventions
//!
//! All source positions are 1-indexed: line 1 is the first line, column 1 is
//! the first character. Records at global scope use `FuncId(0)` and scope 0.

/// Reference to a file row in a record store.
///
/// Value 0 means "no file".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileId(pub i64);

/// Persistent unique identifier for a [`TypeEntry`].
///
/// Other records ([`TypenameEntry`], [`MemberEntry`], [`TypeUseEntry`]) use
/// this to point at a particular type row. Assigned by the store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TypeId(pub i64);

/// Reference to a function entry.
///
/// Function indexing is unimplemented; the only value ever stored is 0,
/// meaning global scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FuncId(pub i64);

/// Scope counter value for global scope.
pub const SCOPE_GLOBAL: u32 = 0;
/// Scope counter value for function top-level scope.
pub const SCOPE_FUNC: u32 = 1;
/// First nested scope value; nested declarations use values >= 2.
pub const SCOPE_NESTED: u32 = 2;

/// Full context describing the source location of any record.
///
/// `func` is 0 at global scope. `scope` is more or less the number of
/// unpaired `{`s before a declaration (see the `SCOPE_*` constants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLoc {
    pub file: FileId,
    pub func: FuncId,
    pub scope: u32,
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    pub fn global(file: FileId, line: u32, column: u32) -> Self {
        SourceLoc {
            file,
            func: FuncId(0),
            scope: SCOPE_GLOBAL,
            line,
            column,
        }
    }
}

/// C language kind of a user defined type.
///
/// The numeric values are the on-disk encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Struct = 1,
    Union = 2,
    Enum = 3,
}

impl TypeKind {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            1 => Some(TypeKind::Struct),
            2 => Some(TypeKind::Union),
            3 => Some(TypeKind::Enum),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Union => "union",
            TypeKind::Enum => "enum",
        }
    }
}

/// The different variants of a [`TypenameEntry`].
///
/// - `Direct`: the common case of a name directly defined with a type;
///   "foo" in `struct foo {};`
/// - `Typedef`: any name defined by a typedef; "foo_t" in
///   `typedef struct foo foo_t;`
/// - `Var`: the name of an instance variable that serves as the only
///   identifier for an unnamed type; "foo" in `struct {} foo;`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Direct = 1,
    Typedef = 2,
    Var = 3,
}

impl NameKind {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            1 => Some(NameKind::Direct),
            2 => Some(NameKind::Typedef),
            3 => Some(NameKind::Var),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Manner in which a type is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseKind {
    /// A variable/member declaration of this type.
    Decl = 1,
    /// An initialization.
    Init = 2,
    /// A function parameter.
    Param = 3,
    /// Any implicit or explicit cast.
    Cast = 4,
    /// Builtin metaprogramming uses: `sizeof(T)`, `alignof(T)`.
    Sizeof = 5,
}

impl UseKind {
    pub fn from_u32(v: u32) -> Option<Self> {
        match v {
            1 => Some(UseKind::Decl),
            2 => Some(UseKind::Init),
            3 => Some(UseKind::Param),
            4 => Some(UseKind::Cast),
            5 => Some(UseKind::Sizeof),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Record for a user defined type declaration.
///
/// This carries no name: not every type has a direct name (an unnamed type
/// has none). Each name that can refer to a type is a separate
/// [`TypenameEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeEntry {
    pub kind: TypeKind,
    /// Whether this entry tracks a complete type definition. Incomplete
    /// types are not indexed; the only stored value is `true`.
    pub complete: bool,
}

/// Record for a name of a type.
///
/// A typename expands the set of names for a particular type. For elaborated
/// types such as `struct foo`, only "foo" is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypenameEntry {
    pub kind: NameKind,
    pub base_type: TypeId,
    pub name: String,
}

/// Record for a struct/union member declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    /// The struct/union the member is declared in.
    pub parent: TypeId,
    /// Type of the member; `None` for primitive types (stored as 0).
    pub base_type: Option<TypeId>,
    pub name: String,
}

/// Record for a miscellaneous use of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeUseEntry {
    pub base_type: TypeId,
    pub kind: UseKind,
}

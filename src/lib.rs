//! cdex: a declaration-level code index for C.
//!
//! cdex walks the ASTs of C translation units, records user-defined types
//! (struct/union/enum), the names by which each type can be referred to,
//! the members of aggregates, and miscellaneous type uses, and persists
//! everything into a SQLite database that the `cdex-query` tool reads.
//!
//! # Position conventions
//!
//! - Line positions: 1-indexed (line 1 is the first line)
//! - Column positions: 1-indexed (column 1 is the first character)
//!
//! # Architecture
//!
//! - [`frontend`] parses C with tree-sitter and lowers parse trees into
//!   an abstract cursor stream (kinds, names, opaque type identities,
//!   locations).
//! - [`indexer`] walks the cursor stream. Aggregates are staged in a
//!   scoreboard and committed atomically, which resolves the ordering
//!   problem of `typedef struct { ... } name;`: the declarator that names
//!   the aggregate arrives after its body has been walked.
//! - [`store`] is the record store boundary with three backends: no-op
//!   (dry runs), in-memory (tests), SQLite (production).
//! - [`search`] parses and executes the query commands.

pub mod error;
pub mod frontend;
pub mod indexer;
pub mod platform;
pub mod records;
pub mod search;
pub mod store;
pub mod version;

pub use error::{StoreError, StoreResult};
pub use frontend::{AstTypeId, CompileArgs, Cursor, CursorKind, Frontend, TranslationUnit};
pub use indexer::{index_project, index_with_store, IndexConfig, InputKind, StoreConfig};
pub use records::{
    FileId, FuncId, MemberEntry, NameKind, SourceLoc, TypeEntry, TypeId, TypeKind, TypeUseEntry,
    TypenameEntry, UseKind,
};
pub use search::run_one_command;
pub use store::{open_durable, open_mem, open_nop, RecordStore, TypenameCursor};

//! SQL statements as query descriptions.
//!
//! Every SQL string the durable backend executes is declared here, once,
//! together with the typed shape of its bind parameters and (for selects)
//! its result columns. Executing a description asserts that it is a member
//! of the registry below, which keeps ad-hoc SQL construction out of the
//! backend: a statement that isn't declared here cannot run.
//!
//! Changing a description requires matching updates to the bind/exec code
//! in `store::sql` - input and output indices are hard coded there.
//!
//! # Tables
//!
//! - `file_table` - central table for all C source-containing files. All
//!   other tables reference a row here by id.
//! - `type_table` - central table for all user-defined types (structs,
//!   unions, enums). The primary name of a type is *not* stored here; all
//!   names of a type are rows in `typename`.
//! - `typename` - keys into the type table. Each row references a type (in
//!   a many-to-one relationship) and says what kind of name it is: direct
//!   tag name, typedef, instance variable.
//! - `incomplete_type` - reserved for incomplete types/forward declarations
//!   encountered before a definition. Created, never written.
//! - `type_use` - miscellaneous uses of a type.
//! - `members` - struct/union member declarations.

/// Typed shape of one bind parameter or result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Bound as SQL NULL (auto-assigned primary keys).
    Null,
    U32,
    U64,
    Str,
}

/// A SQL statement plus the typed shape of its bind parameters.
#[derive(Debug)]
pub struct QueryDesc {
    pub sql: &'static str,
    pub binds: &'static [ColumnKind],
}

/// A select statement: bind shape plus result column shape.
#[derive(Debug)]
pub struct LookupDesc {
    pub base: QueryDesc,
    pub outputs: &'static [ColumnKind],
}

/// Table creation statements, executed in order on read/write open.
/// Preexisting tables are left alone.
pub const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS file_table (\
     id INTEGER PRIMARY KEY ASC,\
     path STRING\
     );",
    "CREATE TABLE IF NOT EXISTS type_table (\
     typeid INTEGER PRIMARY KEY ASC,\
     kind INT,\
     complete INT,\
     file INT,\
     func INT,\
     scope INT,\
     line INT,\
     column INT\
     );",
    "CREATE TABLE IF NOT EXISTS typename (\
     name STRING,\
     kind INT,\
     base_type INT,\
     file INT,\
     func INT,\
     scope INT,\
     line INT,\
     column INT\
     );",
    // no 'func' or 'scope': function-scope incomplete types are always
    // completed within the same function
    "CREATE TABLE IF NOT EXISTS incomplete_type (\
     name STRING,\
     kind INT,\
     base_type INT,\
     file INT,\
     line INT,\
     column INT\
     );",
    "CREATE TABLE IF NOT EXISTS type_use (\
     base_type INT,\
     kind INT,\
     file INT,\
     line INT,\
     column INT\
     );",
    "CREATE TABLE IF NOT EXISTS members (\
     parent INT,\
     base_type INT,\
     name STRING,\
     file INT,\
     line INT,\
     column INT\
     );",
];

pub static FILE_LOOKUP: LookupDesc = LookupDesc {
    base: QueryDesc {
        sql: "SELECT id FROM file_table WHERE ((path == ?1));",
        binds: &[ColumnKind::Str],
    },
    outputs: &[ColumnKind::U64],
};

pub static FILE_ID_LOOKUP: LookupDesc = LookupDesc {
    base: QueryDesc {
        sql: "SELECT path FROM file_table WHERE ((id == ?1));",
        binds: &[ColumnKind::U64],
    },
    outputs: &[ColumnKind::Str],
};

pub static FILE_INSERT: QueryDesc = QueryDesc {
    sql: "INSERT INTO file_table (id, path) VALUES (?1, ?2);",
    binds: &[ColumnKind::Null, ColumnKind::Str],
};

pub static TYPE_LOOKUP: LookupDesc = LookupDesc {
    base: QueryDesc {
        sql: "SELECT typeid, kind, complete, file, func, scope, line, column \
              FROM type_table WHERE (typeid == ?1);",
        binds: &[ColumnKind::U64],
    },
    outputs: &[
        ColumnKind::U64,
        ColumnKind::U32,
        ColumnKind::U32,
        ColumnKind::U64,
        ColumnKind::U64,
        ColumnKind::U32,
        ColumnKind::U32,
        ColumnKind::U32,
    ],
};

pub static TYPE_INSERT: QueryDesc = QueryDesc {
    sql: "INSERT INTO type_table \
          (typeid, kind, complete, file, func, scope, line, column) \
          VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
    binds: &[
        ColumnKind::Null,
        ColumnKind::U32,
        ColumnKind::U32,
        ColumnKind::U64,
        ColumnKind::U64,
        ColumnKind::U32,
        ColumnKind::U32,
        ColumnKind::U32,
    ],
};

// lookups are hard coded for global scope
pub static TYPENAME_LOOKUP: LookupDesc = LookupDesc {
    base: QueryDesc {
        sql: "SELECT base_type,kind FROM typename WHERE (\
              (file == ?1) AND (name == ?2) AND (scope == 0));",
        binds: &[ColumnKind::U64, ColumnKind::Str],
    },
    outputs: &[ColumnKind::U64, ColumnKind::U32],
};

pub static TYPENAME_FIND: LookupDesc = LookupDesc {
    base: QueryDesc {
        sql: "SELECT name, kind, base_type, file, func, scope, line, column \
              FROM typename WHERE ((name LIKE ?1));",
        binds: &[ColumnKind::Str],
    },
    outputs: &[
        ColumnKind::Str,
        ColumnKind::U32,
        ColumnKind::U64,
        ColumnKind::U64,
        ColumnKind::U64,
        ColumnKind::U32,
        ColumnKind::U32,
        ColumnKind::U32,
    ],
};

pub static TYPENAME_INSERT: QueryDesc = QueryDesc {
    sql: "INSERT INTO typename \
          (name, kind, base_type, file, func, scope, line, column) \
          VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
    binds: &[
        ColumnKind::Str,
        ColumnKind::U32,
        ColumnKind::U64,
        ColumnKind::U64,
        ColumnKind::U64,
        ColumnKind::U32,
        ColumnKind::U32,
        ColumnKind::U32,
    ],
};

pub static TYPE_USE_INSERT: QueryDesc = QueryDesc {
    sql: "INSERT INTO type_use (base_type, kind, file, line, column) \
          VALUES (?1, ?2, ?3, ?4, ?5);",
    binds: &[
        ColumnKind::U64,
        ColumnKind::U32,
        ColumnKind::U64,
        ColumnKind::U32,
        ColumnKind::U32,
    ],
};

pub static MEMBER_INSERT: QueryDesc = QueryDesc {
    sql: "INSERT INTO members (parent, base_type, name, file, line, column) \
          VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
    binds: &[
        ColumnKind::U64,
        ColumnKind::U64,
        ColumnKind::Str,
        ColumnKind::U64,
        ColumnKind::U32,
        ColumnKind::U32,
    ],
};

pub static MEMBER_LOOKUP: LookupDesc = LookupDesc {
    base: QueryDesc {
        sql: "SELECT parent, base_type, name, file, line, column \
              FROM members WHERE ((parent == ?1) AND (name LIKE ?2));",
        binds: &[ColumnKind::U64, ColumnKind::Str],
    },
    outputs: &[
        ColumnKind::U64,
        ColumnKind::U64,
        ColumnKind::Str,
        ColumnKind::U64,
        ColumnKind::U32,
        ColumnKind::U32,
    ],
};

/// Every executable query description.
static REGISTRY: &[&QueryDesc] = &[
    &FILE_LOOKUP.base,
    &FILE_ID_LOOKUP.base,
    &FILE_INSERT,
    &TYPE_LOOKUP.base,
    &TYPE_INSERT,
    &TYPENAME_LOOKUP.base,
    &TYPENAME_FIND.base,
    &TYPENAME_INSERT,
    &TYPE_USE_INSERT,
    &MEMBER_INSERT,
    &MEMBER_LOOKUP.base,
];

/// Assert that `desc` is a registry member before compiling it.
///
/// The set of executable statements is fixed at build time; a descriptor
/// constructed anywhere else fails here.
pub fn assert_registered(desc: &QueryDesc) {
    assert!(
        REGISTRY.iter().any(|entry| std::ptr::eq(*entry, desc)),
        "query descriptor not in registry: {}",
        desc.sql
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_members_pass_the_check() {
        for desc in REGISTRY {
            assert_registered(desc);
        }
    }

    #[test]
    #[should_panic(expected = "not in registry")]
    fn foreign_descriptor_is_rejected() {
        let rogue = QueryDesc {
            sql: "DROP TABLE file_table;",
            binds: &[],
        };
        assert_registered(&rogue);
    }

    #[test]
    fn bind_counts_match_placeholders() {
        for desc in REGISTRY {
            let placeholders = (1..=desc.binds.len())
                .map(|i| format!("?{}", i))
                .collect::<Vec<_>>();
            for p in &placeholders {
                assert!(
                    desc.sql.contains(p.as_str()),
                    "query '{}' missing placeholder {}",
                    desc.sql,
                    p
                );
            }
        }
    }
}

//! Serialization boundary between typed records and the SQLite driver.
//!
//! Two functions bridge the gap: [`bind_row`] serializes a typed value
//! vector into a statement's bind parameters, [`read_row`] deserializes a
//! result row into a typed value vector. Both are checked against the
//! column kinds declared in the query registry.
//!
//! SQLite stores signed integers; the record types use unsigned fields.
//! Binding range-checks the conversion; reading reports corruption when a
//! negative value comes back.

use rusqlite::types::ValueRef;
use rusqlite::{Row, Statement};
use tracing::error;

use crate::error::{StoreError, StoreResult};
use crate::store::sql::queries::ColumnKind;

/// A value to bind into a statement. Strings are borrowed from the caller
/// for the duration of the bind.
#[derive(Debug, Clone, Copy)]
pub enum BindValue<'a> {
    Null,
    U32(u32),
    U64(u64),
    Str(&'a str),
}

/// A value read back from a result row. Strings are owned copies; the
/// driver's borrowed column text does not outlive the row.
#[derive(Debug, Clone, PartialEq)]
pub enum ColValue {
    Null,
    U32(u32),
    U64(u64),
    Str(String),
}

impl ColValue {
    /// The u32 payload. The caller has already checked the column kind.
    pub fn u32(&self) -> u32 {
        match self {
            ColValue::U32(v) => *v,
            other => panic!("column kind mismatch: expected u32, got {:?}", other),
        }
    }

    /// The u64 payload.
    pub fn u64(&self) -> u64 {
        match self {
            ColValue::U64(v) => *v,
            other => panic!("column kind mismatch: expected u64, got {:?}", other),
        }
    }

    /// The u64 payload as a signed rowid.
    pub fn rowid(&self) -> i64 {
        self.u64() as i64
    }

    /// Take the string payload.
    pub fn into_string(self) -> String {
        match self {
            ColValue::Str(s) => s,
            other => panic!("column kind mismatch: expected str, got {:?}", other),
        }
    }
}

/// Bind `vals` to `stmt` according to `kinds`.
///
/// Bind indices start at 1. Unsigned values that don't fit the driver's
/// signed types fail with `Range`.
pub fn bind_row(stmt: &mut Statement, kinds: &[ColumnKind], vals: &[BindValue]) -> StoreResult<()> {
    assert_eq!(kinds.len(), vals.len(), "bind arity mismatch");

    for (i, (kind, val)) in kinds.iter().zip(vals.iter()).enumerate() {
        let index = i + 1;
        match (kind, val) {
            (ColumnKind::Null, BindValue::Null) => {
                stmt.raw_bind_parameter(index, rusqlite::types::Null)?;
            }
            (ColumnKind::U32, BindValue::U32(v)) => {
                if *v > i32::MAX as u32 {
                    return Err(StoreError::Range(format!(
                        "bind index {}: {} exceeds i32", index, v
                    )));
                }
                stmt.raw_bind_parameter(index, *v as i32)?;
            }
            (ColumnKind::U64, BindValue::U64(v)) => {
                if *v > i64::MAX as u64 {
                    return Err(StoreError::Range(format!(
                        "bind index {}: {} exceeds i64", index, v
                    )));
                }
                stmt.raw_bind_parameter(index, *v as i64)?;
            }
            (ColumnKind::Str, BindValue::Str(s)) => {
                stmt.raw_bind_parameter(index, *s)?;
            }
            (kind, val) => {
                return Err(StoreError::InvalidInput(format!(
                    "bind index {}: value {:?} doesn't match declared kind {:?}",
                    index, val, kind
                )));
            }
        }
    }
    Ok(())
}

/// Read the current row of an executed select into typed values.
///
/// Column types are checked against `kinds`; a mismatch is store
/// corruption. Negative integers are reported as corruption and converted
/// anyway so a damaged row is visible rather than silently dropped.
pub fn read_row(row: &Row, kinds: &[ColumnKind]) -> StoreResult<Vec<ColValue>> {
    let mut out = Vec::with_capacity(kinds.len());

    for (i, kind) in kinds.iter().enumerate() {
        let value = row.get_ref(i)?;
        let col = match (kind, value) {
            (ColumnKind::Null, _) => ColValue::Null,
            (ColumnKind::U32, ValueRef::Integer(v)) => {
                if v < 0 || v > i32::MAX as i64 {
                    error!("corrupt: column {} int32 value out of range {}", i, v);
                }
                ColValue::U32(v as u32)
            }
            (ColumnKind::U64, ValueRef::Integer(v)) => {
                if v < 0 {
                    error!("corrupt: column {} int64 value out of range {}", i, v);
                }
                ColValue::U64(v as u64)
            }
            (ColumnKind::Str, ValueRef::Text(bytes)) => {
                let text = std::str::from_utf8(bytes).map_err(|_| {
                    StoreError::Corruption(format!("column {} holds non-utf8 text", i))
                })?;
                if text.is_empty() {
                    return Err(StoreError::Corruption(format!(
                        "column {} string value is empty", i
                    )));
                }
                ColValue::Str(text.to_string())
            }
            (kind, value) => {
                return Err(StoreError::Corruption(format!(
                    "column {} has wrong type: got {}, expected {:?}",
                    i,
                    value.data_type(),
                    kind
                )));
            }
        };
        out.push(col);
    }

    Ok(out)
}

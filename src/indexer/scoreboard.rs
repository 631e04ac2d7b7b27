//! Staging scoreboard for aggregate indexing.
//!
//! C record types can't simply be inserted as they are encountered. The
//! declarator that determines an unnamed aggregate's name (`typedef`,
//! variable) appears *after* the aggregate's body has been walked, and an
//! unnamed aggregate that never receives a name must leave no records at
//! all. A database transaction doesn't help: entries to discard are
//! interleaved with entries to keep.
//!
//! So, at the expense of some memory, everything produced while walking
//! one top-level aggregate's subtree is staged here and then committed (or
//! dropped) as a unit. See [`Scoreboard::commit`] for the drain order and
//! the type-map discipline that keeps re-indexed headers from producing
//! duplicate rows.

use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::error::{StoreError, StoreResult};
use crate::frontend::AstTypeId;
use crate::records::{MemberEntry, NameKind, SourceLoc, TypeEntry, TypeId, TypeUseEntry, TypenameEntry, UseKind};
use crate::store::RecordStore;

/// A name staged for an aggregate: a direct tag name, or a late-adopted
/// typedef/var name.
#[derive(Debug, Clone)]
pub struct StagedName {
    pub kind: NameKind,
    pub name: String,
    pub loc: SourceLoc,
}

/// Database entries for one struct/union/enum glued together.
#[derive(Debug, Clone)]
pub struct StagedType {
    /// Opaque identity of the staged aggregate within the TU.
    pub type_id: AstTypeId,
    pub entry: TypeEntry,
    /// Unset while the aggregate is in the unnamed map.
    pub name: Option<StagedName>,
    pub loc: SourceLoc,
}

/// A staged member; `parent` and `base_type` are still opaque ids and are
/// translated at commit time.
#[derive(Debug, Clone)]
pub struct StagedMember {
    pub parent: AstTypeId,
    /// `None` for primitive-typed members.
    pub base_type: Option<AstTypeId>,
    pub name: String,
    pub loc: SourceLoc,
}

/// A staged type use.
///
/// `enclosing` identifies the aggregate the use appears in. It exists to
/// avoid duplicated type uses when a header is reparsed: an aggregate
/// found preexisting at commit time suppresses all of its uses.
#[derive(Debug, Clone)]
pub struct StagedTypeUse {
    pub enclosing: AstTypeId,
    pub base_type: AstTypeId,
    pub kind: UseKind,
    pub loc: SourceLoc,
}

/// State built up while traversing one top-level aggregate.
#[derive(Debug, Default)]
pub struct Scoreboard {
    /// Nearest named ancestors of the node being walked. Members of
    /// anonymous types are attributed to the top of this stack.
    pub current_parents: Vec<AstTypeId>,
    /// Source location of the node being walked.
    pub loc: SourceLoc,

    /// Staged types; the top-level aggregate is always index 0.
    pub new_types: Vec<StagedType>,
    pub members: Vec<StagedMember>,
    pub type_uses: Vec<StagedTypeUse>,
    /// Aggregates staged without a name: opaque id -> index into
    /// `new_types`. Candidates for late naming; dropped at commit if
    /// still present.
    pub unnamed: HashMap<AstTypeId, usize>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Scoreboard::default()
    }

    pub fn is_empty(&self) -> bool {
        self.new_types.is_empty()
            && self.members.is_empty()
            && self.type_uses.is_empty()
            && self.unnamed.is_empty()
    }

    /// Make the scoreboard look new. Allocations are kept for reuse.
    pub fn reset(&mut self) {
        self.current_parents.clear();
        self.new_types.clear();
        self.members.clear();
        self.type_uses.clear();
        self.unnamed.clear();
    }

    /// Stage an aggregate's type record.
    pub fn stage_type(&mut self, type_id: AstTypeId, entry: TypeEntry, name: Option<StagedName>) {
        let loc = self.loc;
        let unnamed = name.is_none();
        self.new_types.push(StagedType {
            type_id,
            entry,
            name,
            loc,
        });
        if unnamed {
            self.unnamed.insert(type_id, self.new_types.len() - 1);
        }
    }

    /// Adopt `name` for the staged aggregate `type_id`, which must be
    /// enrolled in the unnamed map.
    pub fn add_name(&mut self, type_id: AstTypeId, kind: NameKind, name: String) {
        let index = self
            .unnamed
            .remove(&type_id)
            .unwrap_or_else(|| panic!("tried to name an already-named aggregate {:?}", type_id));
        let staged = &mut self.new_types[index];
        staged.name = Some(StagedName {
            kind,
            name,
            loc: self.loc,
        });
    }

    /// Serialize the staged state into `store`.
    ///
    /// Steps:
    /// - staged types first: a type whose typename preexists in the store
    ///   is a duplicate - nothing is inserted and the preexisting durable
    ///   id goes into `tu_type_map`; a new type gets a type row plus its
    ///   typename row, and its durable id goes into a new-types-only
    ///   sub-map; still-unnamed types are dropped;
    /// - members: `parent` translates through the sub-map *only*, so
    ///   members of preexisting (re-walked) aggregates are skipped;
    ///   `base_type` translates through either map;
    /// - type uses: the enclosing aggregate must be in the sub-map, else
    ///   all of its uses are suppressed;
    /// - finally the sub-map merges into `tu_type_map`.
    ///
    /// Recoverable store errors are logged and the record skipped; only
    /// fatal errors (permission) propagate.
    pub fn commit(
        &mut self,
        store: &mut dyn RecordStore,
        tu_type_map: &mut HashMap<AstTypeId, TypeId>,
    ) -> StoreResult<()> {
        debug!(
            "commit {} types, {} members, {} uses, {} nameless",
            self.new_types.len(),
            self.members.len(),
            self.type_uses.len(),
            self.unnamed.len()
        );

        let mut new_types: HashMap<AstTypeId, TypeId> = HashMap::new();

        for staged in &self.new_types {
            if self.unnamed.contains_key(&staged.type_id) {
                warn!("type id {:?} has no name", staged.type_id);
                continue;
            }
            commit_one_type(staged, store, &mut new_types, tu_type_map)?;
        }

        for staged in &self.members {
            // parent must be newly inserted; a preexisting parent means a
            // re-walked header, an unnamed parent means a discarded one
            let Some(&parent) = new_types.get(&staged.parent) else {
                continue;
            };
            let base_type = match staged.base_type {
                None => None,
                Some(ast_id) => {
                    match new_types.get(&ast_id).or_else(|| tu_type_map.get(&ast_id)) {
                        Some(&id) => Some(id),
                        None => {
                            error!("no db entry for member base type {:?}", ast_id);
                            continue;
                        }
                    }
                }
            };
            let entry = MemberEntry {
                parent,
                base_type,
                name: staged.name.clone(),
            };
            if let Err(e) = store.member_insert(&staged.loc, &entry) {
                if e.is_fatal() {
                    return Err(e);
                }
                error!("cannot insert member '{}': {}", staged.name, e);
            }
        }

        for staged in &self.type_uses {
            if !new_types.contains_key(&staged.enclosing) {
                // enclosing aggregate preexists; suppress its uses
                continue;
            }
            let base_type = match new_types
                .get(&staged.base_type)
                .or_else(|| tu_type_map.get(&staged.base_type))
            {
                Some(&id) => id,
                None => {
                    error!("cannot find db entry for type use {:?}", staged.base_type);
                    continue;
                }
            };
            let entry = TypeUseEntry {
                base_type,
                kind: staged.kind,
            };
            if let Err(e) = store.type_use_insert(&staged.loc, &entry) {
                if e.is_fatal() {
                    return Err(e);
                }
                error!("cannot insert type use: {}", e);
            }
        }

        for (ast_id, durable) in new_types {
            tu_type_map.insert(ast_id, durable);
        }

        Ok(())
    }
}

/// Commit one staged type.
///
/// Probes for a preexisting typename first; on a hit the duplicate's
/// durable id goes straight into `tu_type_map` and no rows are inserted.
/// Otherwise the type row goes in before its typename row, so a member
/// whose base type is the aggregate itself (`struct s { struct s *next; }`)
/// can translate against the freshly assigned id.
fn commit_one_type(
    staged: &StagedType,
    store: &mut dyn RecordStore,
    new_types: &mut HashMap<AstTypeId, TypeId>,
    tu_type_map: &mut HashMap<AstTypeId, TypeId>,
) -> StoreResult<()> {
    let name = staged
        .name
        .as_ref()
        .expect("staged type outside the unnamed map has a name");

    let probe = TypenameEntry {
        kind: name.kind,
        base_type: TypeId(0),
        name: name.name.clone(),
    };
    match store.typename_lookup(&name.loc, &probe) {
        Ok(preexisting) => {
            tu_type_map.insert(staged.type_id, preexisting);
            return Ok(());
        }
        Err(StoreError::NotFound) => {}
        Err(e) => {
            if e.is_fatal() {
                return Err(e);
            }
            // can't determine whether the type preexists
            warn!("cannot probe typename '{}': {}", name.name, e);
            return Ok(());
        }
    }

    let type_ref = match store.type_insert(&staged.loc, &staged.entry) {
        Ok(id) => id,
        Err(e) => {
            if e.is_fatal() {
                return Err(e);
            }
            error!(
                "cannot insert type (id {:?}, kind {}): {}",
                staged.type_id,
                staged.entry.kind.as_u32(),
                e
            );
            return Ok(());
        }
    };

    let entry = TypenameEntry {
        kind: name.kind,
        base_type: type_ref,
        name: name.name.clone(),
    };
    if let Err(e) = store.typename_insert(&name.loc, &entry) {
        if e.is_fatal() {
            return Err(e);
        }
        // the type row inserted above is leaked here
        error!(
            "cannot add primary typename (id {:?}, rowid {}, name '{}'): {}",
            staged.type_id, type_ref.0, name.name, e
        );
        return Ok(());
    }

    new_types.insert(staged.type_id, type_ref);
    Ok(())
}

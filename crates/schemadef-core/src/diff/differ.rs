//! Snapshot comparison.
//!
//! Compares a current and a desired [`SchemaSnapshot`] and produces the
//! operations that turn the first into the second, in an order that can be
//! executed directly:
//!
//! 1. views that disappear are dropped,
//! 2. foreign keys that disappear or change are dropped,
//! 3. tables that disappear are dropped, referencing tables first,
//! 4. each desired table is created or altered, in declaration order,
//! 5. new and changed foreign keys are added,
//! 6. views are created or replaced.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::SchemaOp;
use crate::ast::{ColumnPosition, QualifiedName};
use crate::schema::{Column, ForeignKey, Index, PrimaryKey, SchemaSnapshot, Table};

/// Explicit renames found in the desired schema, keyed the way the current
/// schema names things.
#[derive(Debug, Default)]
struct Renames {
    /// Old table name to new table name.
    tables: HashMap<QualifiedName, QualifiedName>,
    /// New table name to (old column name to new column name).
    columns: HashMap<QualifiedName, HashMap<String, String>>,
}

impl Renames {
    fn table(&self, name: &QualifiedName) -> QualifiedName {
        self.tables.get(name).unwrap_or(name).clone()
    }

    /// Maps a column of `table` (already under its new name).
    fn column(&self, table: &QualifiedName, column: &str) -> String {
        self.columns
            .get(table)
            .and_then(|map| map.get(column))
            .map_or_else(|| column.to_string(), Clone::clone)
    }

    fn columns(&self, table: &QualifiedName, columns: &[String]) -> Vec<String> {
        columns.iter().map(|c| self.column(table, c)).collect()
    }

    fn index(&self, table: &QualifiedName, index: &Index) -> Index {
        let mut index = index.clone();
        for column in &mut index.columns {
            column.name = self.column(table, &column.name);
        }
        index
    }

    fn primary_key(&self, table: &QualifiedName, pk: &PrimaryKey) -> PrimaryKey {
        PrimaryKey {
            name: pk.name.clone(),
            columns: self.columns(table, &pk.columns),
        }
    }

    fn foreign_key(&self, table: &QualifiedName, fk: &ForeignKey) -> ForeignKey {
        let referenced_table = self.table(&fk.referenced_table);
        ForeignKey {
            name: fk.name.clone(),
            columns: self.columns(table, &fk.columns),
            referenced_columns: self.columns(&referenced_table, &fk.referenced_columns),
            referenced_table,
            on_delete: fk.on_delete,
            on_update: fk.on_update,
        }
    }
}

/// Compares two schema snapshots.
struct Differ<'a> {
    current: &'a SchemaSnapshot,
    desired: &'a SchemaSnapshot,
    /// Desired tables paired with their current counterpart.
    pairs: Vec<(&'a Table, Option<&'a Table>)>,
    /// Current tables absent from the desired schema, in drop order.
    dropped: Vec<&'a Table>,
    renames: Renames,
}

impl<'a> Differ<'a> {
    fn new(current: &'a SchemaSnapshot, desired: &'a SchemaSnapshot) -> Self {
        let mut renames = Renames::default();
        let mut matched = HashSet::new();
        let mut pairs = Vec::with_capacity(desired.tables.len());

        for table in &desired.tables {
            let counterpart = current.get_table(&table.name).or_else(|| {
                let old = table.renamed_from.as_ref()?;
                if desired.get_table(old).is_some() {
                    return None;
                }
                let found = current.get_table(old)?;
                renames.tables.insert(old.clone(), table.name.clone());
                Some(found)
            });

            if let Some(current_table) = counterpart {
                matched.insert(&current_table.name);
                let columns = column_renames(current_table, table);
                if !columns.is_empty() {
                    renames.columns.insert(table.name.clone(), columns);
                }
            }
            pairs.push((table, counterpart));
        }

        let leaving: Vec<&Table> = current
            .tables
            .iter()
            .filter(|t| !matched.contains(&t.name))
            .collect();

        Self {
            current,
            desired,
            pairs,
            dropped: drop_order(leaving),
            renames,
        }
    }

    fn run(self) -> Vec<SchemaOp> {
        let mut ops = Vec::new();

        for view in &self.current.views {
            if self.desired.get_view(&view.name).is_none() {
                ops.push(SchemaOp::DropView {
                    name: view.name.clone(),
                });
            }
        }

        self.drop_foreign_keys(&mut ops);

        for table in &self.dropped {
            ops.push(SchemaOp::DropTable {
                name: table.name.clone(),
            });
        }

        for (desired, current) in &self.pairs {
            match current {
                None => {
                    let mut table = (*desired).clone();
                    table.foreign_keys.clear();
                    table.renamed_from = None;
                    for column in &mut table.columns {
                        column.renamed_from = None;
                    }
                    ops.push(SchemaOp::CreateTable { table });
                }
                Some(current) => self.diff_table(current, desired, &mut ops),
            }
        }

        self.add_foreign_keys(&mut ops);

        for view in &self.desired.views {
            match self.current.get_view(&view.name) {
                None => ops.push(SchemaOp::CreateView { view: view.clone() }),
                Some(existing) if existing.definition != view.definition => {
                    ops.push(SchemaOp::ReplaceView { view: view.clone() });
                }
                Some(_) => {}
            }
        }

        ops
    }

    fn drop_foreign_keys(&self, ops: &mut Vec<SchemaOp>) {
        for (desired, current) in &self.pairs {
            let Some(current) = current else { continue };
            for fk in &current.foreign_keys {
                let mapped = self.renames.foreign_key(&desired.name, fk);
                let kept = desired
                    .get_foreign_key(&fk.name)
                    .is_some_and(|d| d.same_definition(&mapped));
                if !kept {
                    ops.push(SchemaOp::DropForeignKey {
                        table: current.name.clone(),
                        foreign_key: fk.clone(),
                    });
                }
            }
        }

        // Foreign keys inside a cycle of dropped tables block every drop order.
        let cyclic = cyclic_tables(&self.dropped);
        for table in self.dropped.iter().filter(|t| cyclic.contains(&t.name)) {
            for fk in &table.foreign_keys {
                if fk.referenced_table != table.name && cyclic.contains(&fk.referenced_table) {
                    ops.push(SchemaOp::DropForeignKey {
                        table: table.name.clone(),
                        foreign_key: fk.clone(),
                    });
                }
            }
        }
    }

    fn add_foreign_keys(&self, ops: &mut Vec<SchemaOp>) {
        for (desired, current) in &self.pairs {
            for fk in &desired.foreign_keys {
                let exists = current.is_some_and(|current| {
                    current.get_foreign_key(&fk.name).is_some_and(|c| {
                        fk.same_definition(&self.renames.foreign_key(&desired.name, c))
                    })
                });
                if !exists {
                    ops.push(SchemaOp::AddForeignKey {
                        table: desired.name.clone(),
                        foreign_key: fk.clone(),
                    });
                }
            }
        }
    }

    fn diff_table(&self, current: &Table, desired: &Table, ops: &mut Vec<SchemaOp>) {
        let name = &desired.name;
        trace!(table = %name, "Comparing table");

        if current.name != desired.name {
            ops.push(SchemaOp::RenameTable {
                from: current.name.clone(),
                to: desired.name.clone(),
            });
        }

        let kept_indexes: Vec<bool> = current
            .indexes
            .iter()
            .map(|index| {
                let mapped = self.renames.index(name, index);
                desired
                    .get_index(&index.name)
                    .is_some_and(|d| d.same_definition(&mapped))
            })
            .collect();
        for (index, kept) in current.indexes.iter().zip(&kept_indexes) {
            if !kept {
                ops.push(SchemaOp::DropIndex {
                    table: name.clone(),
                    index: index.clone(),
                });
            }
        }

        let check_matches = match_checks(current, desired);
        for (check, matched) in current.checks.iter().zip(&check_matches.current) {
            if !matched {
                ops.push(SchemaOp::DropCheck {
                    table: name.clone(),
                    check: check.clone(),
                });
            }
        }

        let current_pk = current
            .primary_key
            .as_ref()
            .map(|pk| self.renames.primary_key(name, pk));
        let pk_changed = current_pk.as_ref().map(|pk| &pk.columns)
            != desired.primary_key.as_ref().map(|pk| &pk.columns);
        if pk_changed {
            if let Some(pk) = &current.primary_key {
                ops.push(SchemaOp::DropPrimaryKey {
                    table: name.clone(),
                    primary_key: pk.clone(),
                });
            }
        }

        // Current columns under their desired names.
        let current_columns: Vec<(String, &Column)> = current
            .columns
            .iter()
            .map(|c| (self.renames.column(name, &c.name), c))
            .collect();
        let find_current =
            |column: &str| current_columns.iter().find(|(n, _)| n == column).map(|(_, c)| *c);

        for (mapped, column) in &current_columns {
            if desired.get_column(mapped).is_none() {
                ops.push(SchemaOp::DropColumn {
                    table: name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        for (mapped, column) in &current_columns {
            if *mapped != column.name && desired.get_column(mapped).is_some() {
                ops.push(SchemaOp::RenameColumn {
                    table: name.clone(),
                    from: column.name.clone(),
                    to: mapped.clone(),
                });
            }
        }

        for (idx, column) in desired.columns.iter().enumerate() {
            if find_current(&column.name).is_none() {
                let mut column = column.clone();
                column.renamed_from = None;
                ops.push(SchemaOp::AddColumn {
                    table: name.clone(),
                    position: add_position(desired, idx, &find_current),
                    column,
                });
            }
        }

        for column in &desired.columns {
            if let Some(existing) = find_current(&column.name) {
                if !existing.same_definition(column) {
                    let mut from = existing.clone();
                    from.name.clone_from(&column.name);
                    let mut to = column.clone();
                    to.renamed_from = None;
                    ops.push(SchemaOp::ModifyColumn {
                        table: name.clone(),
                        from,
                        to,
                    });
                }
            }
        }

        if pk_changed {
            if let Some(pk) = &desired.primary_key {
                ops.push(SchemaOp::AddPrimaryKey {
                    table: name.clone(),
                    primary_key: pk.clone(),
                });
            }
        }

        for index in &desired.indexes {
            let exists = current
                .indexes
                .iter()
                .zip(&kept_indexes)
                .any(|(c, kept)| *kept && c.name == index.name);
            if !exists {
                ops.push(SchemaOp::AddIndex {
                    table: name.clone(),
                    index: index.clone(),
                });
            }
        }

        for (check, matched) in desired.checks.iter().zip(&check_matches.desired) {
            if !matched {
                ops.push(SchemaOp::AddCheck {
                    table: name.clone(),
                    check: check.clone(),
                });
            }
        }
    }
}

/// Which checks on each side have an equal-expression partner on the other.
struct CheckMatches {
    current: Vec<bool>,
    desired: Vec<bool>,
}

fn match_checks(current: &Table, desired: &Table) -> CheckMatches {
    let mut matches = CheckMatches {
        current: vec![false; current.checks.len()],
        desired: vec![false; desired.checks.len()],
    };
    for (ci, check) in current.checks.iter().enumerate() {
        let partner = desired
            .checks
            .iter()
            .enumerate()
            .find(|(di, d)| !matches.desired[*di] && d.expr == check.expr);
        if let Some((di, _)) = partner {
            matches.current[ci] = true;
            matches.desired[di] = true;
        }
    }
    matches
}

/// Collects explicit column renames between a current and a desired table.
fn column_renames(current: &Table, desired: &Table) -> HashMap<String, String> {
    desired
        .columns
        .iter()
        .filter_map(|column| {
            let old = column.renamed_from.as_ref()?;
            let renamable = current.get_column(&column.name).is_none()
                && current.get_column(old).is_some()
                && desired.get_column(old).is_none();
            renamable.then(|| (old.clone(), column.name.clone()))
        })
        .collect()
}

/// Chooses where a new column goes so the final order matches `desired`.
fn add_position<'c>(
    desired: &Table,
    idx: usize,
    find_current: &impl Fn(&str) -> Option<&'c Column>,
) -> ColumnPosition {
    let trailing = desired.columns[idx + 1..]
        .iter()
        .all(|c| find_current(&c.name).is_none());
    if trailing {
        ColumnPosition::Last
    } else if idx == 0 {
        ColumnPosition::First
    } else {
        ColumnPosition::After(desired.columns[idx - 1].name.clone())
    }
}

/// Returns true if `from` has a foreign key to `to` that survives until the
/// tables are dropped.
fn blocks_drop(from: &Table, to: &QualifiedName, cyclic: &HashSet<QualifiedName>) -> bool {
    from.name != *to
        && !(cyclic.contains(&from.name) && cyclic.contains(to))
        && from.foreign_keys.iter().any(|fk| fk.referenced_table == *to)
}

/// Orders tables so that each one is dropped before the tables it references.
fn drop_order(tables: Vec<&Table>) -> Vec<&Table> {
    let cyclic = cyclic_tables(&tables);
    let mut remaining = tables;
    let mut ordered = Vec::with_capacity(remaining.len());
    while let Some(idx) = remaining.iter().position(|candidate| {
        !remaining
            .iter()
            .any(|other| blocks_drop(other, &candidate.name, &cyclic))
    }) {
        ordered.push(remaining.remove(idx));
    }
    ordered.extend(remaining);
    ordered
}

/// Returns the tables that reference, and are referenced by, other tables of
/// the same set once the acyclic ends have been peeled off.
fn cyclic_tables(tables: &[&Table]) -> HashSet<QualifiedName> {
    let mut set: HashSet<QualifiedName> = tables.iter().map(|t| t.name.clone()).collect();
    loop {
        let snapshot = set.clone();
        set.retain(|name| {
            let Some(table) = tables.iter().find(|t| t.name == *name) else {
                return false;
            };
            let references = table
                .foreign_keys
                .iter()
                .any(|fk| fk.referenced_table != *name && snapshot.contains(&fk.referenced_table));
            let referenced = tables.iter().any(|other| {
                other.name != *name
                    && snapshot.contains(&other.name)
                    && other.foreign_keys.iter().any(|fk| fk.referenced_table == *name)
            });
            references && referenced
        });
        if set.len() == snapshot.len() {
            return set;
        }
    }
}

/// Computes the operations that transform `current` into `desired`.
///
/// Equal snapshots produce no operations.
#[must_use]
pub fn diff(current: &SchemaSnapshot, desired: &SchemaSnapshot) -> Vec<SchemaOp> {
    let ops = Differ::new(current, desired).run();
    debug!(operations = ops.len(), "Computed schema diff");
    ops
}

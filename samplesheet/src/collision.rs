//! Index collision detection.
//!
//! Rows are grouped by their barcode identity: `Index`, plus `Lane` and
//! `Index2` when those columns exist. A group collides when it references more
//! than one distinct `Sample_ID`, since demultiplexing could not tell those
//! samples apart.

use crate::sheet::{Record, Table};
use crate::sheetconst::{INDEX, INDEX2, LANE, SAMPLE_ID};
use itertools::Itertools;
use std::collections::HashMap;

/// The columns rows are grouped by, resolved once per table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingKey {
    columns: Vec<&'static str>,
}

impl GroupingKey {
    /// Resolve the key for `table`, or return the required columns it lacks.
    pub fn resolve(table: &Table) -> Result<Self, Vec<&'static str>> {
        let missing: Vec<_> = [INDEX, SAMPLE_ID]
            .into_iter()
            .filter(|c| !table.has_column(c))
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }
        let columns = [INDEX, LANE, INDEX2]
            .into_iter()
            .filter(|c| table.has_column(c))
            .collect();
        Ok(GroupingKey { columns })
    }

    /// Resolve the key for `table`, or `None` if the table lacks `Index` or
    /// `Sample_ID`.
    pub fn for_table(table: &Table) -> Option<Self> {
        Self::resolve(table).ok()
    }

    /// Column names making up the key, `Index` first.
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// The key of one row.
    pub fn values<'a>(&self, record: &Record<'a>) -> Vec<&'a str> {
        self.columns
            .iter()
            .map(|c| record.get(c).unwrap_or_default())
            .collect()
    }
}

/// Rows sharing one key and referencing more than one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionGroup {
    /// `(column, value)` pairs of the shared key.
    pub key: Vec<(String, String)>,
    /// Distinct sample IDs in the group, in first-seen order.
    pub sample_ids: Vec<String>,
    /// Indices of the group's rows in the input table.
    pub rows: Vec<usize>,
}

/// All colliding rows of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collisions {
    /// The colliding rows, all columns intact, in input order.
    pub rows: Table,
    /// Input indices of `rows`.
    pub row_indices: Vec<usize>,
    /// Colliding groups in order of first appearance.
    pub groups: Vec<CollisionGroup>,
}

impl Collisions {
    /// Number of colliding rows.
    pub fn len(&self) -> usize {
        self.row_indices.len()
    }

    /// Always false for a value produced by [`check_collisions`].
    pub fn is_empty(&self) -> bool {
        self.row_indices.is_empty()
    }
}

/// Outcome of a collision check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionCheck {
    /// Detection does not apply: these required columns are missing.
    NotApplicable(Vec<&'static str>),
    /// Every key maps to a single sample.
    Clear,
    /// At least one key maps to more than one sample.
    Collisions(Collisions),
}

impl CollisionCheck {
    /// The colliding rows, if any.
    pub fn collisions(&self) -> Option<&Collisions> {
        match self {
            CollisionCheck::Collisions(c) => Some(c),
            CollisionCheck::NotApplicable(_) | CollisionCheck::Clear => None,
        }
    }

    /// Number of colliding rows; zero unless there are collisions.
    pub fn collision_count(&self) -> usize {
        self.collisions().map_or(0, Collisions::len)
    }
}

struct Group<'a> {
    key: Vec<&'a str>,
    sample_ids: Vec<&'a str>,
    rows: Vec<usize>,
}

/// Check `table` for index collisions.
pub fn check_collisions(table: &Table) -> CollisionCheck {
    match GroupingKey::resolve(table) {
        Ok(key) => key.check(table),
        Err(missing) => CollisionCheck::NotApplicable(missing),
    }
}

impl GroupingKey {
    /// Group the rows of `table` by this key and report the groups that
    /// reference more than one sample. The key should come from
    /// [`GroupingKey::resolve`] on the same table; absent key columns read as
    /// empty cells.
    pub fn check(&self, table: &Table) -> CollisionCheck {
        let mut groups: Vec<Group<'_>> = Vec::new();
        let mut by_key: HashMap<Vec<&str>, usize> = HashMap::new();
        let mut row_group = Vec::with_capacity(table.len());
        for (i, record) in table.records().enumerate() {
            let values = self.values(&record);
            let g = *by_key.entry(values.clone()).or_insert_with(|| {
                groups.push(Group {
                    key: values,
                    sample_ids: Vec::new(),
                    rows: Vec::new(),
                });
                groups.len() - 1
            });
            let sample_id = record.get(SAMPLE_ID).unwrap_or_default();
            let group = &mut groups[g];
            if !group.sample_ids.contains(&sample_id) {
                group.sample_ids.push(sample_id);
            }
            group.rows.push(i);
            row_group.push(g);
        }

        let row_indices: Vec<usize> = row_group
            .iter()
            .positions(|&g| groups[g].sample_ids.len() > 1)
            .collect();
        if row_indices.is_empty() {
            return CollisionCheck::Clear;
        }

        let groups = groups
            .into_iter()
            .filter(|g| g.sample_ids.len() > 1)
            .map(|g| CollisionGroup {
                key: self
                    .columns()
                    .iter()
                    .zip_eq(g.key)
                    .map(|(c, v)| (c.to_string(), v.to_string()))
                    .collect(),
                sample_ids: g.sample_ids.into_iter().map(str::to_string).collect(),
                rows: g.rows,
            })
            .collect();
        CollisionCheck::Collisions(Collisions {
            rows: table.select(&row_indices),
            row_indices,
            groups,
        })
    }
}

/// Return the rows of `table` involved in an index collision, in their
/// original order. The result is empty when nothing collides and when the
/// table lacks an `Index` or `Sample_ID` column.
pub fn detect_collisions(table: &Table) -> Table {
    match check_collisions(table) {
        CollisionCheck::Collisions(c) => c.rows,
        CollisionCheck::NotApplicable(_) | CollisionCheck::Clear => table.select(&[]),
    }
}

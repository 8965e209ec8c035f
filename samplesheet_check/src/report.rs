//! Console rendering of tables and collision results.

use itertools::Itertools;
use samplesheet::{CollisionGroup, Collisions, Table};
use std::fmt::{self, Display, Formatter};

const BANNER_WIDTH: usize = 100;

/// A title centered in a line of `#`.
pub fn banner(title: &str) -> String {
    format!("{:#^width$}", format!(" {title} "), width = BANNER_WIDTH)
}

/// Aligned text rendering of a table, with a leading row-index column.
pub struct TableView<'a> {
    table: &'a Table,
    row_labels: Option<&'a [usize]>,
}

impl<'a> TableView<'a> {
    pub fn new(table: &'a Table) -> Self {
        TableView {
            table,
            row_labels: None,
        }
    }

    /// Label rows with these indices instead of 0..n, e.g. the positions of
    /// the rows in the table they were selected from.
    pub fn with_row_labels(mut self, labels: &'a [usize]) -> Self {
        self.row_labels = Some(labels);
        self
    }

    fn label(&self, row: usize) -> usize {
        self.row_labels
            .and_then(|labels| labels.get(row).copied())
            .unwrap_or(row)
    }
}

impl<'a> Display for TableView<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let headers = self.table.headers();
        if headers.is_empty() {
            return writeln!(f, "Empty table");
        }

        let label_width = (0..self.table.len())
            .map(|i| self.label(i).to_string().len())
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(col, h)| {
                self.table
                    .records()
                    .map(|r| r.cells()[col].chars().count())
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        writeln!(
            f,
            "{:label_width$}  {}",
            "",
            headers
                .iter()
                .zip(&widths)
                .map(|(h, &w)| format!("{h:>w$}"))
                .join("  ")
        )?;
        for (i, record) in self.table.records().enumerate() {
            writeln!(
                f,
                "{:>label_width$}  {}",
                self.label(i),
                record
                    .cells()
                    .iter()
                    .zip(&widths)
                    .map(|(c, &w)| format!("{c:>w$}"))
                    .join("  ")
            )?;
        }
        if self.table.is_empty() {
            writeln!(f, "(no rows)")?;
        }
        Ok(())
    }
}

/// One line describing a colliding group.
pub fn describe_group(group: &CollisionGroup) -> String {
    format!(
        "{} shared by samples {}",
        group
            .key
            .iter()
            .map(|(col, val)| format!("{col}={val}"))
            .join(", "),
        group.sample_ids.iter().join(", ")
    )
}

/// The colliding rows followed by a summary of each group.
pub fn render_collisions(collisions: &Collisions) -> String {
    let mut out = TableView::new(&collisions.rows)
        .with_row_labels(&collisions.row_indices)
        .to_string();
    for group in &collisions.groups {
        out.push_str(&describe_group(group));
        out.push('\n');
    }
    out
}

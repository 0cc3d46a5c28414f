//! Assembly of line-groups into annotated tables and hand-off to a
//! diagram producer.
//!
//! Each line-group is one table's `SHOW CREATE TABLE` text. The first line
//! must be the header; columns and key constraints may appear on any line.
//! After assembly every column carries `foreign`/`primary` flags that agree
//! with the table's foreign and primary key lists.

use crate::diagram::DiagramProducer;
use crate::error::{ErdError, Result};
use crate::parser::SyntaxParser;
use crate::schema::{Column, Table};
use ahash::AHashSet;
use tracing::{debug, warn};

/// Converts line-groups into tables and tables into a diagram
#[derive(Debug, Clone)]
pub struct Generator<P, D> {
    parser: P,
    producer: D,
}

impl<P: SyntaxParser, D: DiagramProducer> Generator<P, D> {
    pub fn new(parser: P, producer: D) -> Self {
        Self { parser, producer }
    }

    /// The producer receiving assembled tables
    pub fn producer(&self) -> &D {
        &self.producer
    }

    /// Convert one line-group into a table.
    ///
    /// Returns `None` when the group is empty or its first line is not a
    /// table header. A header-only group yields a table with no columns.
    pub fn to_table<S: AsRef<str>>(&self, lines: &[S]) -> Option<Table> {
        let mut table = self.parser.to_table(lines.first()?.as_ref())?;

        table.columns = lines
            .iter()
            .filter_map(|line| self.parser.to_column(line.as_ref()))
            .collect();

        self.add_foreign_keys(lines, &mut table);
        self.add_primary_keys(lines, &mut table);

        table.unique_constraints = lines
            .iter()
            .filter_map(|line| self.parser.to_unique_constraint(line.as_ref()))
            .collect();

        debug!(
            table = %table.name,
            columns = table.columns.len(),
            foreign_keys = table.foreign_keys.len(),
            primary_keys = table.primary_keys.len(),
            "parsed table"
        );

        Some(table)
    }

    fn add_foreign_keys<S: AsRef<str>>(&self, lines: &[S], table: &mut Table) {
        table.foreign_keys = lines
            .iter()
            .filter_map(|line| self.parser.to_foreign_key(line.as_ref()))
            .collect();

        let columns = {
            let names: AHashSet<&str> = table.foreign_key_columns().collect();
            mark_columns(&table.columns, |col| {
                col.with_foreign(names.contains(col.name.as_str()))
            })
        };
        table.columns = columns;
    }

    fn add_primary_keys<S: AsRef<str>>(&self, lines: &[S], table: &mut Table) {
        table.primary_keys = lines
            .iter()
            .filter_map(|line| self.parser.to_primary_key(line.as_ref()))
            .collect();

        let columns = {
            let names: AHashSet<&str> = table.primary_key_columns().collect();
            mark_columns(&table.columns, |col| {
                col.with_primary(names.contains(col.name.as_str()))
            })
        };
        table.columns = columns;
    }

    /// Pass every table to the producer in a single call so references
    /// between tables can be resolved.
    pub fn to_diagram(&self, tables: &[Table]) -> Result<()> {
        if tables.is_empty() {
            return Err(ErdError::EmptyTableList);
        }
        self.producer.generate_diagram(tables)
    }

    /// Drain a source of line-groups, assemble the tables and produce the
    /// diagram. Returns the tables that were diagrammed.
    pub fn generate<I>(&self, source: I) -> Result<Vec<Table>>
    where
        I: IntoIterator<Item = Result<Vec<String>>>,
    {
        let mut tables = Vec::new();
        for (index, group) in source.into_iter().enumerate() {
            let lines = group?;
            match self.to_table(&lines) {
                Some(table) => tables.push(table),
                None => warn!(
                    group = index,
                    first_line = lines.first().map(String::as_str).unwrap_or(""),
                    "skipping line-group without a CREATE TABLE header"
                ),
            }
        }

        self.to_diagram(&tables)?;
        Ok(tables)
    }
}

/// Rebuild a column list, producing a new value for every column
fn mark_columns<F>(columns: &[Column], mark: F) -> Vec<Column>
where
    F: Fn(&Column) -> Column,
{
    columns.iter().map(mark).collect()
}

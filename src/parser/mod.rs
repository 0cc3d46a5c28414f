//! Line-level extraction of schema facts from `CREATE TABLE` text.
//!
//! Parsing is stateless: each method looks at one line and returns at most
//! one fact. Lines that are not of the requested shape yield `None`. The
//! caller is responsible for grouping lines per table.

mod mysql;

pub use mysql::MySqlRegexParser;

use crate::schema::{Column, ForeignKey, PrimaryKey, Table, UniqueConstraint};

/// Capability set of a dialect-specific DDL line parser.
pub trait SyntaxParser {
    /// Parse a `CREATE TABLE` header into a table with only its name set
    fn to_table(&self, line: &str) -> Option<Table>;

    /// Parse a column definition line
    fn to_column(&self, line: &str) -> Option<Column>;

    /// Parse a `PRIMARY KEY (...)` line
    fn to_primary_key(&self, line: &str) -> Option<PrimaryKey>;

    /// Parse a `CONSTRAINT ... FOREIGN KEY ... REFERENCES ...` line
    fn to_foreign_key(&self, line: &str) -> Option<ForeignKey>;

    /// Parse a `UNIQUE KEY` index line
    fn to_unique_constraint(&self, line: &str) -> Option<UniqueConstraint>;
}

impl<P: SyntaxParser + ?Sized> SyntaxParser for &P {
    fn to_table(&self, line: &str) -> Option<Table> {
        (**self).to_table(line)
    }

    fn to_column(&self, line: &str) -> Option<Column> {
        (**self).to_column(line)
    }

    fn to_primary_key(&self, line: &str) -> Option<PrimaryKey> {
        (**self).to_primary_key(line)
    }

    fn to_foreign_key(&self, line: &str) -> Option<ForeignKey> {
        (**self).to_foreign_key(line)
    }

    fn to_unique_constraint(&self, line: &str) -> Option<UniqueConstraint> {
        (**self).to_unique_constraint(line)
    }
}

/// Parse a comma-separated list of backtick-quoted identifiers
pub fn parse_column_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|c| c.trim().trim_matches('`').to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

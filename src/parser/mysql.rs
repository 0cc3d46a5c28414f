//! MySQL `SHOW CREATE TABLE` dialect.
//!
//! Supports the line shapes MySQL prints for a table definition:
//! - header: ``CREATE TABLE `name` (``
//! - columns: `` `col` varchar(255) NOT NULL DEFAULT 'x',``
//! - ``PRIMARY KEY (`a`,`b`),``
//! - ``UNIQUE KEY `idx` (`a`,`b`),``
//! - ``CONSTRAINT `fk` FOREIGN KEY (`col`) REFERENCES `other` (`id`) ON DELETE ...``

use super::{parse_column_list, SyntaxParser};
use crate::schema::{Column, ForeignKey, PrimaryKey, Table, UniqueConstraint};
use once_cell::sync::Lazy;
use regex::Regex;

/// Identifier characters accepted inside backticks, up to MySQL's 64 limit
const NAME: &str = r"[a-zA-Z0-9_\-]{0,64}";

static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^.*CREATE TABLE (?:IF NOT EXISTS )?`(?P<table>[a-zA-Z0-9_\-]+)` \(\s*$").unwrap()
});

/// Column line: name, datatype, optional scale, then attributes in the
/// order MySQL prints them.
///
/// Scale is 1-5 digits (varchar up to 65,535) or `m,d` for decimal with
/// m in 0..=65 and d in 0..=30.
static COLUMN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^\s*`(?P<column>[a-zA-Z0-9_\-]+)` ",
        r"(?P<datatype>int|varchar|tinyint|datetime|decimal|date)",
        r"(?:\((?P<scale>[0-9]{1,5}|(?:[0-9]|[1-5][0-9]|6[0-5]),(?:[0-9]|[12][0-9]|30))\))?",
        r"(?P<notnull> NOT NULL)?",
        r"(?P<autoincrement> AUTO_INCREMENT)?",
        r"(?: DEFAULT (?P<default>NULL|'(?:[^']|'')*'))?",
        r",?\s*$",
    ))
    .unwrap()
});

static PRIMARY_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\s*PRIMARY KEY \((?P<columns>`{NAME}`(?:,\s*`{NAME}`)*)\),?\s*$"
    ))
    .unwrap()
});

static FOREIGN_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        concat!(
            r"^\s*CONSTRAINT `{name}` FOREIGN KEY \(`(?P<column>{name})`\) ",
            r"REFERENCES `(?P<table>{name})` \(`(?P<source>{name})`\).*$",
        ),
        name = NAME
    ))
    .unwrap()
});

static UNIQUE_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^\s*UNIQUE KEY `(?P<index>{NAME})` \((?P<columns>`{NAME}`(?:,\s*`{NAME}`)*)\).*$"
    ))
    .unwrap()
});

/// Regex-based parser for MySQL table definitions
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlRegexParser;

impl MySqlRegexParser {
    pub fn new() -> Self {
        Self
    }
}

impl SyntaxParser for MySqlRegexParser {
    fn to_table(&self, line: &str) -> Option<Table> {
        let caps = CREATE_TABLE_RE.captures(line)?;
        Some(Table::new(caps.name("table")?.as_str()))
    }

    fn to_column(&self, line: &str) -> Option<Column> {
        let caps = COLUMN_RE.captures(line)?;

        Some(Column {
            name: caps.name("column")?.as_str().to_string(),
            column_type: caps.name("datatype").map(|m| m.as_str().to_string()),
            scale: caps.name("scale").map(|m| m.as_str().to_string()),
            not_null: caps.name("notnull").is_some(),
            auto_increment: caps.name("autoincrement").is_some(),
            default_value: caps.name("default").map(|m| m.as_str().to_string()),
            primary: false,
            foreign: false,
        })
    }

    fn to_primary_key(&self, line: &str) -> Option<PrimaryKey> {
        let caps = PRIMARY_KEY_RE.captures(line)?;
        let columns = parse_column_list(caps.name("columns")?.as_str());
        if columns.is_empty() {
            return None;
        }
        Some(PrimaryKey { key_name: columns })
    }

    fn to_foreign_key(&self, line: &str) -> Option<ForeignKey> {
        let caps = FOREIGN_KEY_RE.captures(line)?;
        Some(ForeignKey::new(
            caps.name("column")?.as_str(),
            caps.name("table")?.as_str(),
            caps.name("source")?.as_str(),
        ))
    }

    fn to_unique_constraint(&self, line: &str) -> Option<UniqueConstraint> {
        let caps = UNIQUE_KEY_RE.captures(line)?;
        Some(UniqueConstraint {
            index_name: caps.name("index")?.as_str().to_string(),
            column_names: parse_column_list(caps.name("columns")?.as_str()),
        })
    }
}

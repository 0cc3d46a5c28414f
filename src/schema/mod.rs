//! Schema model assembled from `SHOW CREATE TABLE` output.
//!
//! This module provides plain data types only:
//! - [`Table`] with its columns and key constraints
//! - [`Column`] as an immutable value; key flags are applied by producing a
//!   new value with [`Column::with_foreign`] / [`Column::with_primary`]
//! - [`ForeignKey`], [`PrimaryKey`] and [`UniqueConstraint`] as parsed

use serde::Serialize;

/// Column definition within a table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Type keyword (int, varchar, tinyint, datetime, decimal, date)
    #[serde(rename = "type")]
    pub column_type: Option<String>,
    /// Length or precision qualifier, e.g. `255` or `10,2`
    pub scale: Option<String>,
    /// Declared NOT NULL
    pub not_null: bool,
    /// Declared AUTO_INCREMENT
    pub auto_increment: bool,
    /// Default value as written, e.g. `NULL` or `'0'`
    pub default_value: Option<String>,
    /// Named in a primary key constraint
    pub primary: bool,
    /// Named as the local column of a foreign key constraint
    pub foreign: bool,
}

impl Column {
    /// Create a column with a name and type and no other attributes
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: Some(column_type.into()),
            ..Self::default()
        }
    }

    /// Set the scale qualifier
    pub fn scale(mut self, scale: impl Into<String>) -> Self {
        self.scale = Some(scale.into());
        self
    }

    /// Copy of this column with the foreign key flag set to `foreign`
    pub fn with_foreign(&self, foreign: bool) -> Column {
        Column {
            foreign,
            ..self.clone()
        }
    }

    /// Copy of this column with the primary key flag set to `primary`
    pub fn with_primary(&self, primary: bool) -> Column {
        Column {
            primary,
            ..self.clone()
        }
    }
}

/// Directed reference from a local column to a column of another table.
///
/// Fields are optional so that incomplete references still render, as
/// `null`, in the diagram text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ForeignKey {
    /// Local column holding the reference
    pub foreign_key_name: Option<String>,
    /// Referenced table
    pub source_table: Option<String>,
    /// Referenced column
    pub source_column: Option<String>,
}

impl ForeignKey {
    pub fn new(
        foreign_key_name: impl Into<String>,
        source_table: impl Into<String>,
        source_column: impl Into<String>,
    ) -> Self {
        Self {
            foreign_key_name: Some(foreign_key_name.into()),
            source_table: Some(source_table.into()),
            source_column: Some(source_column.into()),
        }
    }
}

/// Primary key constraint; composite keys list every column in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PrimaryKey {
    pub key_name: Vec<String>,
}

impl PrimaryKey {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_name: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Column names covered by this key
    pub fn column_names(&self) -> &[String] {
        &self.key_name
    }
}

/// Unique index declared inside a table body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UniqueConstraint {
    pub index_name: String,
    pub column_names: Vec<String>,
}

/// Table assembled from one line-group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Table name
    pub name: String,
    /// Column definitions in declaration order
    pub columns: Vec<Column>,
    /// Foreign key constraints in declaration order
    pub foreign_keys: Vec<ForeignKey>,
    /// Primary key constraints in declaration order
    pub primary_keys: Vec<PrimaryKey>,
    /// Unique indexes in declaration order
    pub unique_constraints: Vec<UniqueConstraint>,
}

impl Table {
    /// Create a table with a name and nothing attached
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get a column by name
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of all columns referenced by this table's primary keys
    pub fn primary_key_columns(&self) -> impl Iterator<Item = &str> {
        self.primary_keys
            .iter()
            .flat_map(|pk| pk.key_name.iter().map(String::as_str))
    }

    /// Names of all local foreign key columns
    pub fn foreign_key_columns(&self) -> impl Iterator<Item = &str> {
        self.foreign_keys
            .iter()
            .filter_map(|fk| fk.foreign_key_name.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_flags_leave_original_untouched() {
        let col = Column::new("id", "int").scale("11");
        let marked = col.with_foreign(true).with_primary(true);

        assert!(!col.foreign);
        assert!(!col.primary);
        assert!(marked.foreign);
        assert!(marked.primary);
        assert_eq!(marked.scale.as_deref(), Some("11"));
    }

    #[test]
    fn test_primary_key_columns_flatten_composite_keys() {
        let mut table = Table::new("order_items");
        table.primary_keys.push(PrimaryKey::new(["order_id", "line"]));
        table.primary_keys.push(PrimaryKey::new(["sku"]));

        let names: Vec<&str> = table.primary_key_columns().collect();
        assert_eq!(names, vec!["order_id", "line", "sku"]);
    }
}

//! Entity relationship diagrams from MySQL `SHOW CREATE TABLE` output.
//!
//! The pipeline has three stages:
//! - [`parser`] extracts one schema fact per DDL line
//! - [`generator`] assembles a line-group into an annotated [`schema::Table`]
//! - [`diagram`] turns all tables into PlantUML text and renders it
//!
//! [`source`] provides line-groups from a directory or a dump file.

pub mod config;
pub mod diagram;
pub mod error;
pub mod generator;
pub mod parser;
pub mod schema;
pub mod source;

pub use error::{ErdError, Result};

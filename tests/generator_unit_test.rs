//! Unit tests for line-group assembly and diagram hand-off.

use ddl_erd::diagram::DiagramProducer;
use ddl_erd::generator::Generator;
use ddl_erd::parser::MySqlRegexParser;
use ddl_erd::schema::{ForeignKey, Table};
use ddl_erd::{ErdError, Result};
use std::cell::RefCell;
use std::collections::HashSet;

/// Producer that remembers every call instead of drawing anything
#[derive(Default)]
struct RecordingProducer {
    calls: RefCell<Vec<Vec<Table>>>,
}

impl DiagramProducer for RecordingProducer {
    fn generate_diagram(&self, tables: &[Table]) -> Result<()> {
        self.calls.borrow_mut().push(tables.to_vec());
        Ok(())
    }
}

fn generator() -> Generator<MySqlRegexParser, RecordingProducer> {
    Generator::new(MySqlRegexParser::new(), RecordingProducer::default())
}

fn product_details() -> Vec<&'static str> {
    vec![
        "CREATE TABLE `product_details` (",
        "  `id` int(11) NOT NULL AUTO_INCREMENT,",
        "  `sku` varchar(64) NOT NULL,",
        "  `price` decimal(10,2) DEFAULT NULL,",
        "  `created_by_id` int(11) NOT NULL,",
        "  `category_id` int(11) DEFAULT NULL,",
        "  `created_at` datetime NOT NULL,",
        "  PRIMARY KEY (`id`),",
        "  UNIQUE KEY `uniq_sku` (`sku`),",
        "  KEY `idx_created_by` (`created_by_id`),",
        "  CONSTRAINT `product_details_ibfk_created_by_id` FOREIGN KEY (`created_by_id`) REFERENCES `users` (`id`),",
        "  CONSTRAINT `product_details_ibfk_category` FOREIGN KEY (`category_id`) REFERENCES `categories` (`id`) ON DELETE SET NULL",
        ") ENGINE=InnoDB DEFAULT CHARSET=utf8mb4;",
    ]
}

fn assert_flags_consistent(table: &Table) {
    let fk_names: HashSet<&str> = table.foreign_key_columns().collect();
    let pk_names: HashSet<&str> = table.primary_key_columns().collect();

    for column in &table.columns {
        assert_eq!(
            column.foreign,
            fk_names.contains(column.name.as_str()),
            "foreign flag of {}",
            column.name
        );
        assert_eq!(
            column.primary,
            pk_names.contains(column.name.as_str()),
            "primary flag of {}",
            column.name
        );
    }
}

mod to_table_tests {
    use super::*;

    #[test]
    fn test_orders_scenario() {
        let lines = [
            "CREATE TABLE `orders` (",
            "  `id` int(11) NOT NULL AUTO_INCREMENT,",
            "  PRIMARY KEY (`id`),",
        ];
        let table = generator().to_table(&lines).unwrap();

        assert_eq!(table.name, "orders");
        assert_eq!(table.columns.len(), 1);

        let id = &table.columns[0];
        assert_eq!(id.name, "id");
        assert_eq!(id.column_type.as_deref(), Some("int"));
        assert_eq!(id.scale.as_deref(), Some("11"));
        assert!(id.auto_increment);
        assert!(id.not_null);
        assert!(id.primary);
        assert!(!id.foreign);
    }

    #[test]
    fn test_full_table() {
        let table = generator().to_table(&product_details()).unwrap();

        assert_eq!(table.name, "product_details");
        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["id", "sku", "price", "created_by_id", "category_id", "created_at"]
        );
        assert_eq!(
            table.foreign_keys,
            vec![
                ForeignKey::new("created_by_id", "users", "id"),
                ForeignKey::new("category_id", "categories", "id"),
            ]
        );
        assert_eq!(table.primary_keys.len(), 1);
        assert_eq!(table.unique_constraints.len(), 1);
        assert_eq!(table.unique_constraints[0].column_names, vec!["sku"]);

        assert!(table.get_column("id").unwrap().primary);
        assert!(table.get_column("created_by_id").unwrap().foreign);
        assert!(table.get_column("category_id").unwrap().foreign);
        assert!(!table.get_column("sku").unwrap().foreign);
        assert_flags_consistent(&table);
    }

    #[test]
    fn test_composite_primary_key_marks_every_member() {
        let lines = [
            "CREATE TABLE `order_items` (",
            "  `order_id` int(11) NOT NULL,",
            "  `line_no` int(11) NOT NULL,",
            "  `qty` int(11) NOT NULL DEFAULT '1',",
            "  PRIMARY KEY (`order_id`,`line_no`),",
            "  CONSTRAINT `fk_items_order` FOREIGN KEY (`order_id`) REFERENCES `orders` (`id`)",
            ")",
        ];
        let table = generator().to_table(&lines).unwrap();

        let order_id = table.get_column("order_id").unwrap();
        assert!(order_id.primary);
        assert!(order_id.foreign);
        assert!(table.get_column("line_no").unwrap().primary);
        assert!(!table.get_column("qty").unwrap().primary);
        assert_flags_consistent(&table);
    }

    #[test]
    fn test_empty_group_yields_none() {
        let lines: [&str; 0] = [];
        assert!(generator().to_table(&lines).is_none());
    }

    #[test]
    fn test_group_without_header_yields_none() {
        let lines = [
            "  `id` int(11) NOT NULL AUTO_INCREMENT,",
            "CREATE TABLE `late_header` (",
            "  PRIMARY KEY (`id`),",
        ];
        assert!(generator().to_table(&lines).is_none());
    }

    #[test]
    fn test_header_only_group_yields_empty_table() {
        let table = generator().to_table(&["CREATE TABLE `empty` ("]).unwrap();
        assert_eq!(table, Table::new("empty"));
    }

    #[test]
    fn test_key_referencing_undeclared_column_marks_nothing() {
        let lines = [
            "CREATE TABLE `t` (",
            "  `a` int(11) NOT NULL,",
            "  PRIMARY KEY (`missing`),",
        ];
        let table = generator().to_table(&lines).unwrap();
        assert!(!table.columns[0].primary);
        assert_eq!(table.primary_keys[0].key_name, vec!["missing"]);
    }

    #[test]
    fn test_to_table_is_idempotent() {
        let gen = generator();
        let lines = product_details();
        assert_eq!(gen.to_table(&lines), gen.to_table(&lines));
    }

    #[test]
    fn test_accepts_owned_lines() {
        let lines: Vec<String> = product_details().into_iter().map(String::from).collect();
        let table = generator().to_table(&lines).unwrap();
        assert_eq!(table.columns.len(), 6);
    }
}

mod to_diagram_tests {
    use super::*;

    #[test]
    fn test_empty_table_list_is_rejected() {
        let gen = generator();
        let err = gen.to_diagram(&[]).unwrap_err();

        assert!(matches!(err, ErdError::EmptyTableList));
        assert!(gen.producer().calls.borrow().is_empty());
    }

    #[test]
    fn test_all_tables_are_delivered_in_one_call() {
        let gen = generator();
        let tables = vec![Table::new("a"), Table::new("b"), Table::new("c")];
        gen.to_diagram(&tables).unwrap();

        let calls = gen.producer().calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], tables);
    }

    #[test]
    fn test_generate_skips_groups_without_table() {
        let gen = generator();
        let groups: Vec<Result<Vec<String>>> = vec![
            Ok(vec!["CREATE TABLE `users` (".to_string()]),
            Ok(vec!["-- not a table".to_string()]),
            Ok(Vec::new()),
            Ok(product_details().into_iter().map(String::from).collect()),
        ];

        let tables = gen.generate(groups).unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "product_details"]);
        assert_eq!(gen.producer().calls.borrow().len(), 1);
    }

    #[test]
    fn test_generate_without_any_table_fails() {
        let gen = generator();
        let groups: Vec<Result<Vec<String>>> = vec![Ok(vec!["SELECT 1;".to_string()])];

        assert!(matches!(gen.generate(groups), Err(ErdError::EmptyTableList)));
        assert!(gen.producer().calls.borrow().is_empty());
    }

    #[test]
    fn test_generate_stops_on_source_error() {
        let gen = generator();
        let groups: Vec<Result<Vec<String>>> = vec![
            Ok(vec!["CREATE TABLE `users` (".to_string()]),
            Err(ErdError::InvalidDirectory("/nowhere".into())),
        ];

        assert!(matches!(
            gen.generate(groups),
            Err(ErdError::InvalidDirectory(_))
        ));
        assert!(gen.producer().calls.borrow().is_empty());
    }
}

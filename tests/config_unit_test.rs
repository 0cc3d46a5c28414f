//! Unit tests for YAML configuration and producer construction.

use ddl_erd::config::DiagramConfig;
use ddl_erd::diagram::{OutputFileFormat, PlantUmlProducer};
use ddl_erd::ErdError;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_full_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("erd.yaml");
    fs::write(
        &path,
        r#"
title: pim
filename: out/pim
format: svg
generate_plantuml_file: true
show_orphan_foreign_keys: true
limit_size: 8192
renderer: /opt/plantuml/bin/plantuml
"#,
    )
    .unwrap();

    let config = DiagramConfig::load(&path).unwrap();
    assert_eq!(config.title, "pim");
    assert_eq!(config.filename, Some(PathBuf::from("out/pim")));
    assert_eq!(config.format, OutputFileFormat::Svg);
    assert!(config.generate_plantuml_file);
    assert!(config.show_orphan_foreign_keys);
    assert_eq!(config.limit_size, 8192);
    assert_eq!(config.renderer, "/opt/plantuml/bin/plantuml");
}

#[test]
fn test_load_invalid_yaml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("erd.yaml");
    fs::write(&path, "format: jpeg\n").unwrap();

    let err = DiagramConfig::load(&path).unwrap_err();
    assert!(matches!(err, ErdError::Config { .. }));
}

#[test]
fn test_load_missing_file() {
    let err = DiagramConfig::load(&PathBuf::from("/madeup/erd.yaml")).unwrap_err();
    assert!(matches!(err, ErdError::Io { .. }));
}

#[test]
fn test_producer_from_config() {
    let config = DiagramConfig {
        filename: Some(PathBuf::from("pim")),
        format: OutputFileFormat::Svg,
        renderer: "my-plantuml".to_string(),
        ..DiagramConfig::default()
    };

    let producer = PlantUmlProducer::from_config(&config).unwrap();
    assert_eq!(producer.image_path(), Some(PathBuf::from("pim.svg")));
    assert_eq!(producer.renderer().program(), "my-plantuml");
}

#[test]
fn test_producer_from_invalid_config() {
    let config = DiagramConfig {
        limit_size: 0,
        ..DiagramConfig::default()
    };
    assert!(matches!(
        PlantUmlProducer::from_config(&config),
        Err(ErdError::InvalidConfig(_))
    ));
}

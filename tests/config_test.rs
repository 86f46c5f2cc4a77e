//! Tests for layered seed configuration.

use loja_data_gen::{Locale, Profile};
use loja_seed::config::{CountsConfig, SeedConfig, SeedYamlConfig};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("seed.yaml");
    fs::write(&path, content).unwrap();
    (dir, path)
}

#[test]
fn test_parse_full_yaml() {
    let yaml = SeedYamlConfig::parse(
        r#"
database: loja.db
seed: 42
locale: en
profile: restock
counts:
  sales: 10
delivery_statuses: ["Aguardando", "Entregue"]
catalog:
  payment_methods:
    Dinheiro: 0.5
    Pix: 0.5
"#,
    )
    .unwrap();

    assert_eq!(yaml.database, Some(PathBuf::from("loja.db")));
    assert_eq!(yaml.seed, Some(42));
    assert_eq!(yaml.profile.as_deref(), Some("restock"));
    assert_eq!(yaml.counts.sales, Some(10));
    assert_eq!(yaml.counts.customers, None);
    assert_eq!(yaml.delivery_statuses.as_ref().map(Vec::len), Some(2));
    assert!(yaml.catalog.product_categories.is_none());
}

#[test]
fn test_yaml_layer_over_profile() {
    let (_dir, path) = write_config(
        r#"
seed: 7
profile: restock
locale: en
counts:
  sales: 12
"#,
    );

    let config = SeedConfig::builder()
        .config_file(Some(path))
        .build()
        .unwrap();

    assert_eq!(config.profile, Profile::Restock);
    assert_eq!(config.plan.seed, 7);
    assert_eq!(config.plan.locale, Locale::En);
    assert_eq!(config.plan.counts.sales, 12);
    assert_eq!(config.plan.counts.products, 400);
}

#[test]
fn test_cli_overrides_yaml() {
    let yaml = SeedYamlConfig::parse("seed: 7\ncounts:\n  customers: 3\n  sales: 4\n").unwrap();

    let config = SeedConfig::builder()
        .yaml(yaml)
        .seed(Some(99))
        .database(Some(PathBuf::from("other.db")))
        .counts(CountsConfig {
            sales: Some(1),
            ..Default::default()
        })
        .dry_run(true)
        .build()
        .unwrap();

    assert_eq!(config.plan.seed, 99);
    assert_eq!(config.database, PathBuf::from("other.db"));
    assert_eq!(config.plan.counts.customers, 3);
    assert_eq!(config.plan.counts.sales, 1);
    assert!(config.plan.dry_run);
}

#[test]
fn test_custom_catalog_is_used() {
    let yaml = SeedYamlConfig::parse(
        "catalog:\n  product_categories:\n    Madeiras: 0.25\n    Tintas: 0.75\n",
    )
    .unwrap();
    let config = SeedConfig::builder().yaml(yaml).build().unwrap();

    let labels: Vec<&str> = config.plan.catalog.product_categories.labels().collect();
    assert_eq!(labels, vec!["Madeiras", "Tintas"]);
    assert_eq!(
        config.plan.catalog.payment_methods.weight("Cartão de Crédito"),
        Some(0.6)
    );
}

#[test]
fn test_invalid_weights_rejected() {
    let yaml = SeedYamlConfig::parse(
        "catalog:\n  payment_methods:\n    Dinheiro: 0.5\n    Boleto: 0.1\n",
    )
    .unwrap();
    let err = SeedConfig::builder().yaml(yaml).build().unwrap_err();
    assert!(err.to_string().contains("payment_methods"));
}

#[test]
fn test_empty_status_list_rejected() {
    let yaml = SeedYamlConfig::parse("delivery_statuses: []\n").unwrap();
    assert!(SeedConfig::builder().yaml(yaml.clone()).build().is_err());

    // Allowed when no statuses are generated
    let config = SeedConfig::builder()
        .yaml(yaml)
        .profile(Some("restock".to_string()))
        .build()
        .unwrap();
    assert!(config.plan.delivery_statuses.is_empty());
}

#[test]
fn test_unknown_locale_rejected() {
    let err = SeedConfig::builder()
        .locale(Some("xx".to_string()))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("Unsupported locale"));
}

#[test]
fn test_missing_config_file() {
    let result = SeedConfig::builder()
        .config_file(Some(PathBuf::from("/nonexistent/seed.yaml")))
        .build();
    assert!(result.is_err());
}

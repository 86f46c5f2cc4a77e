//! Consistency checks over a seeded store.
//!
//! Each check is a counting query: zero means the property holds for every
//! sale in the store.

use crate::store::Store;
use anyhow::{Context, Result};
use loja_data_gen::model::DELIVERED;
use loja_data_gen::schema::{self, store_schema};
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;

/// Largest tolerated gap between a stored amount and price times quantity
pub const AMOUNT_TOLERANCE: f64 = 0.005;

/// Result of a single check
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CheckResult {
    pub name: String,
    pub description: String,
    pub violations: u64,
}

/// Outcome of all checks
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct VerifyReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub sales_checked: u64,
    pub checks: Vec<CheckResult>,
    pub total_violations: u64,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.total_violations == 0
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Checked {} sales", self.sales_checked)?;
        for check in &self.checks {
            let mark = if check.violations == 0 { "ok" } else { "FAIL" };
            writeln!(
                f,
                "  [{:>4}] {:<28} {} ({} violations)",
                mark, check.name, check.description, check.violations
            )?;
        }
        if self.is_clean() {
            write!(f, "No violations found")
        } else {
            write!(f, "{} violations found", self.total_violations)
        }
    }
}

struct Check {
    name: String,
    description: String,
    sql: String,
    params: Vec<String>,
}

fn checks() -> Vec<Check> {
    let tables = store_schema();
    let mut checks = Vec::new();

    if let Some(sales) = tables.get_table(schema::SALES) {
        for (column, fk) in sales.foreign_keys() {
            checks.push(Check {
                name: format!("orphan_{}", column),
                description: format!("{} references a missing {} row", column, fk.to_table),
                sql: format!(
                    "SELECT COUNT(*) FROM {s} v LEFT JOIN {t} r ON v.{c} = r.{tc} WHERE r.{tc} IS NULL",
                    s = schema::SALES,
                    t = fk.to_table,
                    c = column,
                    tc = fk.to_column
                ),
                params: Vec::new(),
            });
        }
    }

    checks.push(Check {
        name: "delivery_date_status".to_string(),
        description: format!("data_entrega is set exactly when the status is {}", DELIVERED),
        sql: format!(
            "SELECT COUNT(*) FROM {} v JOIN {} s ON v.id_status_entrega = s.id_status_entrega \
             WHERE (s.descricao = ?) <> (v.data_entrega IS NOT NULL)",
            schema::SALES,
            schema::DELIVERY_STATUSES
        ),
        params: vec![DELIVERED.to_string()],
    });

    checks.push(Check {
        name: "amount_matches_price".to_string(),
        description: "valor_venda equals preco_unitario times quantidade".to_string(),
        sql: format!(
            "SELECT COUNT(*) FROM {} v JOIN {} p ON v.id_produto = p.id_produto \
             WHERE ABS(CAST(v.valor_venda AS DOUBLE) \
             - ROUND(CAST(p.preco_unitario AS DOUBLE) * v.quantidade, 2)) > {}",
            schema::SALES,
            schema::PRODUCTS,
            AMOUNT_TOLERANCE
        ),
        params: Vec::new(),
    });

    checks.push(Check {
        name: "quantity_range".to_string(),
        description: "quantidade is between 1 and 10".to_string(),
        sql: format!(
            "SELECT COUNT(*) FROM {} WHERE quantidade < 1 OR quantidade > 10",
            schema::SALES
        ),
        params: Vec::new(),
    });

    checks
}

/// Run every check against the committed contents of `store`
pub fn verify(store: &Store) -> Result<VerifyReport> {
    for table in store_schema().tables_in_order() {
        if !store.table_exists(&table.name)? {
            anyhow::bail!(
                "table {} does not exist; run `loja-seed init` or `loja-seed seed` first",
                table.name
            );
        }
    }

    let conn = store.connection();
    let mut results = Vec::new();
    for check in checks() {
        let violations: i64 = conn
            .query_row(&check.sql, duckdb::params_from_iter(check.params.clone()), |row| {
                row.get(0)
            })
            .with_context(|| format!("Check {} failed to run", check.name))?;
        results.push(CheckResult {
            name: check.name,
            description: check.description,
            violations: violations.max(0) as u64,
        });
    }

    Ok(VerifyReport {
        database: store.path().map(|p| p.display().to_string()),
        sales_checked: store.count(schema::SALES)?,
        total_violations: results.iter().map(|c| c.violations).sum(),
        checks: results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_orphan_check_per_sale_reference() {
        let checks = checks();
        let orphans = checks
            .iter()
            .filter(|c| c.name.starts_with("orphan_"))
            .count();
        assert_eq!(orphans, 5);
        assert!(checks.iter().any(|c| c.name == "quantity_range"));
    }

    #[test]
    fn test_report_display() {
        let report = VerifyReport {
            database: None,
            sales_checked: 10,
            checks: vec![CheckResult {
                name: "quantity_range".to_string(),
                description: "quantidade is between 1 and 10".to_string(),
                violations: 2,
            }],
            total_violations: 2,
        };
        assert!(!report.is_clean());
        assert!(report.to_string().ends_with("2 violations found"));
    }
}

//! Batch seeding driver.
//!
//! One run generates reference rows, reads them back as a pool and then
//! generates sales over that pool. Everything happens inside a single
//! [`SeedSession`]: the batch is either committed as a whole or not at all.

use crate::progress::SeedProgress;
use crate::store::{Record, SeedSession, Store};
use anyhow::Result;
use chrono::NaiveDate;
use loja_data_gen::model::DEFAULT_DELIVERY_STATUSES;
use loja_data_gen::{Catalog, Generator, Locale, Profile, SeedCounts};
use schemars::JsonSchema;
use serde::Serialize;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Everything one seeding run needs
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub counts: SeedCounts,
    /// Descriptions delivery statuses are drawn from
    pub delivery_statuses: Vec<String>,
    pub seed: u64,
    pub locale: Locale,
    pub catalog: Catalog,
    /// Generate and insert everything, then roll back
    pub dry_run: bool,
    pub progress: bool,
    /// Anchor for date ranges; the current day when unset
    pub today: Option<NaiveDate>,
}

impl SeedPlan {
    pub fn from_profile(profile: Profile, seed: u64) -> Self {
        Self {
            counts: profile.counts(),
            delivery_statuses: DEFAULT_DELIVERY_STATUSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            seed,
            locale: Locale::default(),
            catalog: Catalog::default(),
            dry_run: false,
            progress: false,
            today: None,
        }
    }
}

/// Rows written to one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TableRows {
    pub table: String,
    pub rows: u64,
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SeedReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub seed: u64,
    pub locale: String,
    pub dry_run: bool,
    /// False for dry runs
    pub committed: bool,
    pub tables: Vec<TableRows>,
    pub total_rows: u64,
    pub elapsed_secs: f64,
}

impl SeedReport {
    pub fn rows(&self, table: &str) -> u64 {
        self.tables
            .iter()
            .find(|t| t.table == table)
            .map(|t| t.rows)
            .unwrap_or(0)
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.database.as_deref().unwrap_or(":memory:");
        if self.committed {
            writeln!(f, "Seeded {} (seed {}, locale {})", target, self.seed, self.locale)?;
        } else {
            writeln!(
                f,
                "Dry run against {} (seed {}, locale {}), nothing was written",
                target, self.seed, self.locale
            )?;
        }
        for t in &self.tables {
            writeln!(f, "  {:<20} {:>8}", t.table, t.rows)?;
        }
        write!(
            f,
            "  {:<20} {:>8} rows in {:.2}s",
            "total", self.total_rows, self.elapsed_secs
        )
    }
}

/// Runs seeding plans against a store
pub struct Seeder;

impl Seeder {
    /// Seed one batch.
    ///
    /// Missing tables are created inside the batch's transaction. Sales are
    /// drawn from every reference row visible to the batch, including rows
    /// seeded earlier, and fail with [`loja_data_gen::GenError::EmptySelection`]
    /// when a reference table is empty. A failure or a dry run leaves no new
    /// tables or rows behind.
    pub fn run(store: &mut Store, plan: &SeedPlan) -> Result<SeedReport> {
        let start = Instant::now();
        let database = store.path().map(|p| p.display().to_string());

        let mut gen = Generator::new(plan.seed, plan.locale).with_catalog(plan.catalog.clone());
        if let Some(today) = plan.today {
            gen = gen.with_today(today);
        }

        info!(
            "seeding {} rows (seed {}, locale {}{})",
            plan.counts.total(),
            plan.seed,
            plan.locale,
            if plan.dry_run { ", dry run" } else { "" }
        );

        let progress = SeedProgress::new(plan.counts.total() as u64, plan.progress)?;
        let session = store.session()?;
        session.create_schema()?;
        let counts = &plan.counts;
        let mut tables = Vec::with_capacity(6);

        tables.push(insert_batch(&session, &progress, counts.customers, || {
            Ok(gen.customer())
        })?);
        tables.push(insert_batch(&session, &progress, counts.products, || {
            Ok(gen.product())
        })?);
        tables.push(insert_batch(&session, &progress, counts.cashiers, || {
            Ok(gen.cashier())
        })?);
        tables.push(insert_batch(
            &session,
            &progress,
            counts.payment_methods,
            || Ok(gen.payment_method()),
        )?);
        let statuses = plan.delivery_statuses.as_slice();
        tables.push(insert_batch(
            &session,
            &progress,
            counts.delivery_statuses,
            || Ok(gen.delivery_status(statuses)?),
        )?);

        let pool = if counts.sales > 0 {
            session.reference_pool()?
        } else {
            Default::default()
        };
        if counts.sales > 0 {
            if let Some(table) = pool.first_empty_table() {
                warn!("{} has no rows, sales cannot reference it", table);
            }
        }
        tables.push(insert_batch(&session, &progress, counts.sales, || {
            Ok(gen.sale(&pool)?)
        })?);
        progress.finish();

        let total_rows = tables.iter().map(|t| t.rows).sum();
        let committed = if plan.dry_run {
            session.rollback()?;
            info!("dry run finished, {} rows rolled back", total_rows);
            false
        } else {
            session.commit()?;
            info!("committed {} rows", total_rows);
            true
        };

        Ok(SeedReport {
            database,
            seed: plan.seed,
            locale: plan.locale.to_string(),
            dry_run: plan.dry_run,
            committed,
            tables,
            total_rows,
            elapsed_secs: start.elapsed().as_secs_f64(),
        })
    }
}

fn insert_batch<T: Record>(
    session: &SeedSession<'_>,
    progress: &SeedProgress,
    count: usize,
    mut make: impl FnMut() -> Result<T>,
) -> Result<TableRows> {
    progress.table(T::TABLE);
    for _ in 0..count {
        let row = make()?;
        session.insert(&row)?;
        progress.inc();
    }
    debug!("inserted {} rows into {}", count, T::TABLE);
    Ok(TableRows {
        table: T::TABLE.to_string(),
        rows: count as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use loja_data_gen::schema;

    #[test]
    fn test_plan_from_profile() {
        let plan = SeedPlan::from_profile(Profile::Restock, 7);
        assert_eq!(plan.counts.products, 400);
        assert_eq!(plan.counts.cashiers, 0);
        assert_eq!(plan.delivery_statuses.len(), 3);
        assert!(!plan.dry_run);
    }

    #[test]
    fn test_report_display() {
        let report = SeedReport {
            database: Some("loja.db".to_string()),
            seed: 42,
            locale: "pt_BR".to_string(),
            dry_run: true,
            committed: false,
            tables: vec![TableRows {
                table: schema::CUSTOMERS.to_string(),
                rows: 3,
            }],
            total_rows: 3,
            elapsed_secs: 0.1,
        };
        let text = report.to_string();
        assert!(text.starts_with("Dry run against loja.db"));
        assert!(text.contains("clientes"));
        assert_eq!(report.rows(schema::CUSTOMERS), 3);
        assert_eq!(report.rows(schema::SALES), 0);
    }
}

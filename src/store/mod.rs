//! DuckDB-backed store for the construction-materials schema.
//!
//! A [`Store`] owns one DuckDB connection to a single database file. Writes
//! go through a [`SeedSession`], which wraps a transaction: nothing becomes
//! visible to other connections until [`SeedSession::commit`], and a session
//! dropped without committing rolls back.
//!
//! # Example
//!
//! ```ignore
//! use loja_seed::store::Store;
//!
//! let mut store = Store::open_in_memory()?;
//! store.create_schema()?;
//! let session = store.session()?;
//! // ... insert rows ...
//! session.commit()?;
//! ```

mod records;

pub use records::Record;

use anyhow::{Context, Result};
use duckdb::{Connection, Transaction};
use loja_data_gen::schema::{self, store_schema};
use loja_data_gen::{
    Cashier, Customer, CustomerId, DeliveryStatus, PaymentMethod, Persisted, Product,
    ReferencePool, Sale, SaleId,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Database file used when none is given
pub const DEFAULT_DATABASE: &str = "loja_material_construcao.db";

/// Row count of one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, schemars::JsonSchema)]
pub struct TableCount {
    pub table: String,
    pub exists: bool,
    pub rows: u64,
}

/// Handle to an open store
pub struct Store {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) the database file at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        debug!("opened database {}", path.display());
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to create in-memory DuckDB database")?;
        Ok(Self { conn, path: None })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create every table that does not exist yet, referenced tables first.
    ///
    /// Returns the number of tables that were created by this call.
    pub fn create_schema(&self) -> Result<usize> {
        create_tables(&self.conn)
    }

    pub fn table_exists(&self, table: &str) -> Result<bool> {
        table_exists(&self.conn, table)
    }

    /// Row counts for every table of the schema; missing tables count as zero
    pub fn table_counts(&self) -> Result<Vec<TableCount>> {
        let schema = store_schema();
        let mut counts = Vec::with_capacity(schema.tables.len());
        for table in schema.tables_in_order() {
            let exists = table_exists(&self.conn, &table.name)?;
            let rows = if exists {
                count_rows(&self.conn, &table.name)?
            } else {
                0
            };
            counts.push(TableCount {
                table: table.name.clone(),
                exists,
                rows,
            });
        }
        Ok(counts)
    }

    pub fn count(&self, table: &str) -> Result<u64> {
        count_rows(&self.conn, table)
    }

    /// Every committed row of an entity
    pub fn fetch_all<T: Record>(&self) -> Result<Vec<Persisted<T::Id, T>>> {
        records::fetch_all(&self.conn)
    }

    /// Sales made to one customer
    pub fn sales_for_customer(&self, customer: CustomerId) -> Result<Vec<Persisted<SaleId, Sale>>> {
        records::fetch_by(&self.conn, "id_cliente", customer.get())
    }

    /// Begin a write session
    pub fn session(&mut self) -> Result<SeedSession<'_>> {
        let tx = self
            .conn
            .transaction()
            .context("Failed to begin transaction")?;
        Ok(SeedSession { tx })
    }
}

fn create_tables(conn: &Connection) -> Result<usize> {
    let schema = store_schema();
    let mut created = 0;
    for table in schema.tables_in_order() {
        let existed = table_exists(conn, &table.name)?;
        for statement in table.to_duckdb_ddl() {
            conn.execute_batch(&statement)
                .with_context(|| format!("Failed to create table {}", table.name))?;
        }
        if !existed {
            debug!("created table {}", table.name);
            created += 1;
        }
    }
    info!("schema ready ({} tables created)", created);
    Ok(created)
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let n: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
            duckdb::params![table],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to look up table {}", table))?;
    Ok(n > 0)
}

fn count_rows(conn: &Connection, table: &str) -> Result<u64> {
    let n: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })
        .with_context(|| format!("Failed to count rows of {}", table))?;
    Ok(n.max(0) as u64)
}

/// A write transaction against the store.
///
/// Reads through the session see its own uncommitted inserts.
pub struct SeedSession<'a> {
    tx: Transaction<'a>,
}

impl SeedSession<'_> {
    /// Create missing tables inside this session; they vanish on rollback
    pub fn create_schema(&self) -> Result<usize> {
        create_tables(&self.tx)
    }

    /// Insert one row and return its assigned identifier
    pub fn insert<T: Record>(&self, record: &T) -> Result<T::Id> {
        records::insert(&self.tx, record)
    }

    pub fn fetch_all<T: Record>(&self) -> Result<Vec<Persisted<T::Id, T>>> {
        records::fetch_all(&self.tx)
    }

    pub fn sales_for_customer(&self, customer: CustomerId) -> Result<Vec<Persisted<SaleId, Sale>>> {
        records::fetch_by(&self.tx, "id_cliente", customer.get())
    }

    pub fn count(&self, table: &str) -> Result<u64> {
        count_rows(&self.tx, table)
    }

    /// Every reference row visible to this session
    pub fn reference_pool(&self) -> Result<ReferencePool> {
        let pool = ReferencePool {
            customers: self.fetch_all::<Customer>()?,
            products: self.fetch_all::<Product>()?,
            cashiers: self.fetch_all::<Cashier>()?,
            payment_methods: self.fetch_all::<PaymentMethod>()?,
            delivery_statuses: self.fetch_all::<DeliveryStatus>()?,
        };
        debug!(
            "reference pool: {} {}, {} {}, {} {}, {} {}, {} {}",
            pool.customers.len(),
            schema::CUSTOMERS,
            pool.products.len(),
            schema::PRODUCTS,
            pool.cashiers.len(),
            schema::CASHIERS,
            pool.payment_methods.len(),
            schema::PAYMENT_METHODS,
            pool.delivery_statuses.len(),
            schema::DELIVERY_STATUSES
        );
        Ok(pool)
    }

    /// Make every insert of this session durable
    pub fn commit(self) -> Result<()> {
        self.tx.commit().context("Failed to commit seeding batch")
    }

    /// Discard every insert of this session
    pub fn rollback(self) -> Result<()> {
        self.tx.rollback().context("Failed to roll back seeding batch")
    }
}

//! Typed repositories over the store tables.
//!
//! Each entity implements [`Record`]: the values it binds on insert and how
//! it is decoded from a row. The SQL itself is derived once from the schema
//! model, so column order here must follow [`loja_data_gen::store_schema`].

use anyhow::{Context, Result};
use chrono::NaiveDate;
use duckdb::types::{Type, Value};
use duckdb::{params_from_iter, Connection, Row};
use loja_data_gen::schema::{self, SqlType, Table};
use loja_data_gen::{
    Cashier, CashierId, Customer, CustomerId, DeliveryStatus, DeliveryStatusId, GenError,
    PaymentMethod, PaymentMethodId, Persisted, Product, ProductId, Sale, SaleId,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An entity persisted in one table of the store
pub trait Record: Sized {
    type Id: Copy + From<i64>;

    /// Table the entity lives in
    const TABLE: &'static str;

    /// Values for every non-identity column, in schema order
    fn values(&self) -> Vec<Value>;

    /// Decode from a row of the table's cached `SELECT`; index 0 is the id
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self>;
}

/// SQL derived once per table of the store schema
struct TableStatements {
    /// `None` when the table has no primary key to return
    insert: Option<String>,
    select: String,
    id: String,
}

static STATEMENTS: Lazy<HashMap<String, TableStatements>> = Lazy::new(|| {
    schema::store_schema()
        .tables
        .iter()
        .map(|table| {
            let statements = TableStatements {
                insert: insert_sql(table).ok(),
                select: select_sql(table),
                id: table.primary_key_column().unwrap_or("rowid").to_string(),
            };
            (table.name.clone(), statements)
        })
        .collect()
});

fn statements(name: &str) -> Result<&'static TableStatements> {
    STATEMENTS
        .get(name)
        .with_context(|| format!("Table '{}' is not part of the store schema", name))
}

fn placeholder(sql_type: &SqlType) -> String {
    match sql_type {
        SqlType::Decimal(..) | SqlType::Date => format!("CAST(? AS {})", sql_type.to_duckdb()),
        _ => "?".to_string(),
    }
}

fn select_expr(name: &str, sql_type: &SqlType) -> String {
    match sql_type {
        SqlType::Decimal(..) => format!("CAST({} AS DOUBLE)", name),
        SqlType::Date => format!("CAST({} AS VARCHAR)", name),
        SqlType::Integer => format!("CAST({} AS BIGINT)", name),
        _ => name.to_string(),
    }
}

/// `INSERT ... RETURNING <id>` for a table
fn insert_sql(table: &Table) -> Result<String> {
    let id = table
        .primary_key_column()
        .with_context(|| format!("Table '{}' has no primary key", table.name))?;
    let columns: Vec<_> = table
        .columns
        .iter()
        .filter(|c| c.sql_type != SqlType::Identity)
        .collect();
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    let placeholders: Vec<String> = columns.iter().map(|c| placeholder(&c.sql_type)).collect();

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table.name,
        names.join(", "),
        placeholders.join(", "),
        id
    ))
}

/// `SELECT` of every column, id first, in schema order
fn select_sql(table: &Table) -> String {
    let exprs: Vec<String> = table
        .columns
        .iter()
        .map(|c| select_expr(&c.name, &c.sql_type))
        .collect();
    format!("SELECT {} FROM {}", exprs.join(", "), table.name)
}

/// Insert one row and return the identifier the store assigned
pub fn insert<T: Record>(conn: &Connection, record: &T) -> Result<T::Id> {
    let sql = statements(T::TABLE)?
        .insert
        .as_deref()
        .with_context(|| format!("Table '{}' has no primary key", T::TABLE))?;
    let mut stmt = conn
        .prepare_cached(sql)
        .with_context(|| format!("Failed to prepare insert into {}", T::TABLE))?;
    let id: i64 = stmt
        .query_row(params_from_iter(record.values()), |row| row.get(0))
        .with_context(|| format!("Failed to insert into {}", T::TABLE))?;
    Ok(T::Id::from(id))
}

/// Every row of the entity's table, ordered by id
pub fn fetch_all<T: Record>(conn: &Connection) -> Result<Vec<Persisted<T::Id, T>>> {
    fetch_where(conn, None, &[])
}

/// Rows whose `column` equals `value`, ordered by id
pub fn fetch_by<T: Record>(
    conn: &Connection,
    column: &str,
    value: i64,
) -> Result<Vec<Persisted<T::Id, T>>> {
    fetch_where(conn, Some(column), &[Value::BigInt(value)])
}

fn fetch_where<T: Record>(
    conn: &Connection,
    column: Option<&str>,
    params: &[Value],
) -> Result<Vec<Persisted<T::Id, T>>> {
    let cached = statements(T::TABLE)?;
    let sql = match column {
        Some(column) => format!("{} WHERE {} = ? ORDER BY {}", cached.select, column, cached.id),
        None => format!("{} ORDER BY {}", cached.select, cached.id),
    };

    let mut stmt = conn
        .prepare_cached(&sql)
        .with_context(|| format!("Failed to prepare query on {}", T::TABLE))?;
    let rows = stmt
        .query_map(params_from_iter(params.to_vec()), |row| {
            let id: i64 = row.get(0)?;
            Ok(Persisted::new(T::Id::from(id), T::from_row(row)?))
        })
        .with_context(|| format!("Failed to query {}", T::TABLE))?;

    rows.collect::<duckdb::Result<Vec<_>>>()
        .with_context(|| format!("Failed to decode rows of {}", T::TABLE))
}

fn date_value(date: NaiveDate) -> Value {
    Value::Text(date.format(DATE_FORMAT).to_string())
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> duckdb::Error {
    duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn date_at(row: &Row<'_>, idx: usize) -> duckdb::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

fn optional_date_at(row: &Row<'_>, idx: usize) -> duckdb::Result<Option<NaiveDate>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| NaiveDate::parse_from_str(&t, DATE_FORMAT).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

fn label_at<T: FromStr<Err = GenError>>(row: &Row<'_>, idx: usize) -> duckdb::Result<T> {
    let text: String = row.get(idx)?;
    text.parse().map_err(|e| conversion_error(idx, e))
}

fn count_at(row: &Row<'_>, idx: usize) -> duckdb::Result<u32> {
    let n: i64 = row.get(idx)?;
    u32::try_from(n).map_err(|e| conversion_error(idx, e))
}

impl Record for Customer {
    type Id = CustomerId;
    const TABLE: &'static str = schema::CUSTOMERS;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.tax_id.clone()),
            Value::Text(self.address.clone()),
            Value::Text(self.phone.clone()),
            Value::Text(self.email.clone()),
            Value::Text(self.segment.label().to_string()),
            Value::Text(self.channel.label().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Customer {
            name: row.get(1)?,
            tax_id: row.get(2)?,
            address: row.get(3)?,
            phone: row.get(4)?,
            email: row.get(5)?,
            segment: label_at(row, 6)?,
            channel: label_at(row, 7)?,
        })
    }
}

impl Record for Product {
    type Id = ProductId;
    const TABLE: &'static str = schema::PRODUCTS;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.description.clone()),
            Value::Text(self.category.clone()),
            Value::Double(self.unit_price),
            Value::Double(self.seasonal_weight),
            Value::Text(self.unit.label().to_string()),
        ]
    }

    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Product {
            description: row.get(1)?,
            category: row.get(2)?,
            unit_price: row.get(3)?,
            seasonal_weight: row.get(4)?,
            unit: label_at(row, 5)?,
        })
    }
}

impl Record for Cashier {
    type Id = CashierId;
    const TABLE: &'static str = schema::CASHIERS;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.role.label().to_string()),
            date_value(self.hired_on),
        ]
    }

    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Cashier {
            name: row.get(1)?,
            role: label_at(row, 2)?,
            hired_on: date_at(row, 3)?,
        })
    }
}

impl Record for PaymentMethod {
    type Id = PaymentMethodId;
    const TABLE: &'static str = schema::PAYMENT_METHODS;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.description.clone()),
            Value::BigInt(i64::from(self.term_days)),
            Value::Double(self.discount),
        ]
    }

    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(PaymentMethod {
            description: row.get(1)?,
            term_days: count_at(row, 2)?,
            discount: row.get(3)?,
        })
    }
}

impl Record for DeliveryStatus {
    type Id = DeliveryStatusId;
    const TABLE: &'static str = schema::DELIVERY_STATUSES;

    fn values(&self) -> Vec<Value> {
        vec![Value::Text(self.description.clone())]
    }

    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(DeliveryStatus {
            description: row.get(1)?,
        })
    }
}

impl Record for Sale {
    type Id = SaleId;
    const TABLE: &'static str = schema::SALES;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::BigInt(self.customer_id.get()),
            Value::BigInt(self.product_id.get()),
            date_value(self.sold_on),
            Value::Double(self.amount),
            Value::BigInt(i64::from(self.quantity)),
            Value::BigInt(self.payment_method_id.get()),
            Value::BigInt(self.delivery_status_id.get()),
            self.delivered_on.map(date_value).unwrap_or(Value::Null),
            Value::BigInt(self.cashier_id.get()),
        ]
    }

    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Sale {
            customer_id: CustomerId(row.get(1)?),
            product_id: ProductId(row.get(2)?),
            sold_on: date_at(row, 3)?,
            amount: row.get(4)?,
            quantity: count_at(row, 5)?,
            payment_method_id: PaymentMethodId(row.get(6)?),
            delivery_status_id: DeliveryStatusId(row.get(7)?),
            delivered_on: optional_date_at(row, 8)?,
            cashier_id: CashierId(row.get(9)?),
        })
    }
}

//! Synthetic data for a construction-materials store.
//!
//! Declares the six entities of the store (customers, products, cashiers,
//! payment methods, delivery statuses and sales), the table layout they are
//! persisted with, and generators that produce plausible random instances.
//! Nothing in this crate touches storage: generated entities carry no
//! identifier until a store assigns one.
//!
//! # Example
//!
//! ```rust
//! use loja_data_gen::{Generator, Locale};
//!
//! let mut gen = Generator::new(42, Locale::PtBr);
//! let product = gen.product();
//!
//! assert!((10.0..=500.0).contains(&product.unit_price));
//! ```

pub mod catalog;
pub mod error;
pub mod fake;
pub mod generator;
pub mod model;
pub mod schema;

pub use catalog::{Catalog, WeightedTable};
pub use error::GenError;
pub use fake::{FakeData, Locale};
pub use generator::{Generator, Profile, ReferencePool, SeedCounts};
pub use model::{
    Cashier, CashierId, CashierRole, Customer, CustomerId, CustomerSegment, DeliveryStatus,
    DeliveryStatusId, PaymentMethod, PaymentMethodId, Persisted, Product, ProductId,
    PurchaseChannel, Sale, SaleId, UnitOfMeasure,
};
pub use schema::{store_schema, Column, ForeignKey, Schema, SqlType, Table};

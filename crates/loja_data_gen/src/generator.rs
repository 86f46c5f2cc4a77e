//! Entity generators.
//!
//! Reference entities are generated independently of storage. Sales need
//! persisted reference rows to point at, handed over as a [`ReferencePool`].

use crate::catalog::Catalog;
use crate::error::GenError;
use crate::fake::{FakeData, Locale};
use crate::model::{
    round_cents, Cashier, CashierId, CashierRole, Customer, CustomerId, CustomerSegment,
    DeliveryStatus, DeliveryStatusId, PaymentMethod, PaymentMethodId, Persisted, Product,
    ProductId, PurchaseChannel, Sale, UnitOfMeasure, BOLETO, CASH,
};
use crate::schema;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeding presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// 100 rows of every reference entity and 500 sales
    #[default]
    Full,
    /// 400 products, 80 customers and 200 sales against an already seeded store
    Restock,
}

impl Profile {
    pub fn counts(&self) -> SeedCounts {
        match self {
            Profile::Full => SeedCounts {
                customers: 100,
                products: 100,
                cashiers: 100,
                payment_methods: 100,
                delivery_statuses: 100,
                sales: 500,
            },
            Profile::Restock => SeedCounts {
                customers: 80,
                products: 400,
                cashiers: 0,
                payment_methods: 0,
                delivery_statuses: 0,
                sales: 200,
            },
        }
    }
}

impl std::str::FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Profile::Full),
            "restock" => Ok(Profile::Restock),
            _ => Err(format!("Unknown profile: {}. Use full or restock", s)),
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Full => write!(f, "full"),
            Profile::Restock => write!(f, "restock"),
        }
    }
}

/// Rows to generate per entity in one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedCounts {
    pub customers: usize,
    pub products: usize,
    pub cashiers: usize,
    pub payment_methods: usize,
    pub delivery_statuses: usize,
    pub sales: usize,
}

impl SeedCounts {
    pub fn total(&self) -> usize {
        self.customers
            + self.products
            + self.cashiers
            + self.payment_methods
            + self.delivery_statuses
            + self.sales
    }
}

/// Every persisted reference row a sale may point at
#[derive(Debug, Clone, Default)]
pub struct ReferencePool {
    pub customers: Vec<Persisted<CustomerId, Customer>>,
    pub products: Vec<Persisted<ProductId, Product>>,
    pub cashiers: Vec<Persisted<CashierId, Cashier>>,
    pub payment_methods: Vec<Persisted<PaymentMethodId, PaymentMethod>>,
    pub delivery_statuses: Vec<Persisted<DeliveryStatusId, DeliveryStatus>>,
}

impl ReferencePool {
    /// First reference table with no rows, if any
    pub fn first_empty_table(&self) -> Option<&'static str> {
        let lens = [
            (schema::CUSTOMERS, self.customers.len()),
            (schema::PRODUCTS, self.products.len()),
            (schema::PAYMENT_METHODS, self.payment_methods.len()),
            (schema::DELIVERY_STATUSES, self.delivery_statuses.len()),
            (schema::CASHIERS, self.cashiers.len()),
        ];
        lens.iter().find(|(_, len)| *len == 0).map(|(t, _)| *t)
    }
}

/// Main data generator
pub struct Generator<R: Rng = StdRng> {
    fake: FakeData<R>,
    catalog: Catalog,
    today: NaiveDate,
}

impl Generator<StdRng> {
    /// Seeded generator; the same seed and day reproduce the same entities
    pub fn new(seed: u64, locale: Locale) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), locale)
    }
}

impl<R: Rng> Generator<R> {
    pub fn with_rng(rng: R, locale: Locale) -> Self {
        Self {
            fake: FakeData::new(rng, locale),
            catalog: Catalog::default(),
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Replace the weighted tables
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Pin the day date ranges are anchored to
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn days_ago(&self, days: i64) -> NaiveDate {
        self.today - Duration::days(days)
    }

    pub fn customer(&mut self) -> Customer {
        Customer {
            name: self.fake.name(),
            tax_id: self.fake.tax_id(),
            address: self.fake.address(),
            phone: self.fake.phone(),
            email: self.fake.email(),
            segment: self.fake.pick(CustomerSegment::ALL),
            channel: self.fake.pick(PurchaseChannel::ALL),
        }
    }

    pub fn product(&mut self) -> Product {
        let category = self
            .catalog
            .product_categories
            .choose(self.fake.rng())
            .to_string();
        Product {
            description: self.fake.sentence(4),
            category,
            unit_price: self.fake.price(10.0, 500.0),
            seasonal_weight: self.fake.float_range(0.8, 1.2),
            unit: self.fake.pick(UnitOfMeasure::ALL),
        }
    }

    pub fn cashier(&mut self) -> Cashier {
        let earliest = self.days_ago(5 * 365);
        let hired_on = self.fake.date_between(earliest, self.today);
        Cashier {
            name: self.fake.name(),
            role: self.fake.pick(CashierRole::ALL),
            hired_on,
        }
    }

    pub fn payment_method(&mut self) -> PaymentMethod {
        let description = self
            .catalog
            .payment_methods
            .choose(self.fake.rng())
            .to_string();
        let term_days = if description == BOLETO {
            self.fake.int_range(0, 30) as u32
        } else {
            0
        };
        let discount = if description == CASH {
            self.fake.float_range(0.0, 0.1)
        } else {
            0.0
        };
        PaymentMethod {
            description,
            term_days,
            discount,
        }
    }

    /// Pick one description uniformly from `allowed`
    pub fn delivery_status<S: AsRef<str>>(
        &mut self,
        allowed: &[S],
    ) -> Result<DeliveryStatus, GenError> {
        let description = self
            .fake
            .choose(allowed)
            .ok_or(GenError::EmptyStatusList)?;
        Ok(DeliveryStatus {
            description: description.as_ref().to_string(),
        })
    }

    /// Generate a sale over uniformly chosen rows of `pool`.
    ///
    /// Fails with [`GenError::EmptySelection`] when any reference table in
    /// the pool has no rows.
    pub fn sale(&mut self, pool: &ReferencePool) -> Result<Sale, GenError> {
        fn empty(table: &'static str) -> GenError {
            GenError::EmptySelection { table }
        }

        let customer = self
            .fake
            .choose(&pool.customers)
            .ok_or_else(|| empty(schema::CUSTOMERS))?;
        let product = self
            .fake
            .choose(&pool.products)
            .ok_or_else(|| empty(schema::PRODUCTS))?;
        let payment_method = self
            .fake
            .choose(&pool.payment_methods)
            .ok_or_else(|| empty(schema::PAYMENT_METHODS))?;
        let status = self
            .fake
            .choose(&pool.delivery_statuses)
            .ok_or_else(|| empty(schema::DELIVERY_STATUSES))?;
        let cashier = self
            .fake
            .choose(&pool.cashiers)
            .ok_or_else(|| empty(schema::CASHIERS))?;

        let year_ago = self.days_ago(365);
        let month_ago = self.days_ago(30);
        let sold_on = self.fake.date_between(year_ago, self.today);
        let delivered_on = if status.row.is_delivered() {
            Some(self.fake.date_between(month_ago, self.today))
        } else {
            None
        };
        let quantity = self.fake.int_range(1, 10) as u32;

        Ok(Sale {
            customer_id: customer.id,
            product_id: product.id,
            sold_on,
            amount: round_cents(product.row.unit_price * f64::from(quantity)),
            quantity,
            payment_method_id: payment_method.id,
            delivery_status_id: status.id,
            delivered_on,
            cashier_id: cashier.id,
        })
    }
}

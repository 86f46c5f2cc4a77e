//! End-to-end tests for the seeding driver.

use chrono::{Duration, NaiveDate};
use loja_data_gen::model::{round_cents, DELIVERED};
use loja_data_gen::schema;
use loja_data_gen::{
    Cashier, Customer, CustomerId, DeliveryStatus, GenError, Locale, PaymentMethod, Product,
    Profile, Sale, SeedCounts,
};
use loja_seed::seed::{SeedPlan, Seeder};
use loja_seed::store::Store;
use loja_seed::verify::verify;
use std::collections::HashMap;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn plan(counts: SeedCounts) -> SeedPlan {
    SeedPlan {
        counts,
        today: Some(today()),
        ..SeedPlan::from_profile(Profile::Full, 42)
    }
}

fn small_counts() -> SeedCounts {
    SeedCounts {
        customers: 20,
        products: 30,
        cashiers: 5,
        payment_methods: 8,
        delivery_statuses: 6,
        sales: 150,
    }
}

fn total_rows(store: &Store) -> u64 {
    store.table_counts().unwrap().iter().map(|t| t.rows).sum()
}

#[test]
fn test_single_row_of_each_with_delivered_status() {
    let mut store = Store::open_in_memory().unwrap();
    let plan = SeedPlan {
        delivery_statuses: vec![DELIVERED.to_string()],
        ..plan(SeedCounts {
            customers: 1,
            products: 1,
            cashiers: 1,
            payment_methods: 1,
            delivery_statuses: 1,
            sales: 1,
        })
    };

    let report = Seeder::run(&mut store, &plan).unwrap();
    assert!(report.committed);
    assert_eq!(report.total_rows, 6);
    assert_eq!(report.rows(schema::SALES), 1);

    let product = &store.fetch_all::<Product>().unwrap()[0];
    let sales = store.fetch_all::<Sale>().unwrap();
    assert_eq!(sales.len(), 1);
    let sale = &sales[0].row;

    assert_eq!(sale.customer_id, CustomerId(1));
    assert_eq!(sale.product_id, product.id);
    assert_eq!(sale.cashier_id, store.fetch_all::<Cashier>().unwrap()[0].id);
    assert_eq!(
        sale.payment_method_id,
        store.fetch_all::<PaymentMethod>().unwrap()[0].id
    );
    assert_eq!(
        sale.delivery_status_id,
        store.fetch_all::<DeliveryStatus>().unwrap()[0].id
    );
    assert!((1..=10).contains(&sale.quantity));
    let expected = round_cents(product.row.unit_price * f64::from(sale.quantity));
    assert!((sale.amount - expected).abs() < 0.005);

    let delivered = sale.delivered_on.expect("delivered sale has a date");
    assert!(delivered >= today() - Duration::days(30) && delivered <= today());
    assert!(sale.sold_on >= today() - Duration::days(365) && sale.sold_on <= today());
}

#[test]
fn test_sales_on_empty_store_fail_and_leave_no_rows() {
    let mut store = Store::open_in_memory().unwrap();
    let plan = plan(SeedCounts {
        sales: 1,
        ..Default::default()
    });

    let err = Seeder::run(&mut store, &plan).unwrap_err();
    assert_eq!(
        err.downcast_ref::<GenError>(),
        Some(&GenError::EmptySelection {
            table: schema::CUSTOMERS
        })
    );
    assert_eq!(total_rows(&store), 0);
}

#[test]
fn test_failed_batch_rolls_back_reference_rows() {
    let mut store = Store::open_in_memory().unwrap();
    let plan = plan(SeedCounts {
        customers: 5,
        products: 5,
        sales: 3,
        ..Default::default()
    });

    let err = Seeder::run(&mut store, &plan).unwrap_err();
    assert_eq!(
        err.downcast_ref::<GenError>(),
        Some(&GenError::EmptySelection {
            table: schema::PAYMENT_METHODS
        })
    );
    assert_eq!(total_rows(&store), 0);
    assert!(!store.table_exists(schema::CUSTOMERS).unwrap());
}

#[test]
fn test_failed_batch_leaves_no_tables_on_fresh_store() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loja.db");
    let plan = plan(SeedCounts {
        customers: 2,
        sales: 1,
        ..Default::default()
    });

    {
        let mut store = Store::open(&path).unwrap();
        assert!(Seeder::run(&mut store, &plan).is_err());
    }

    let store = Store::open(&path).unwrap();
    assert!(store
        .table_counts()
        .unwrap()
        .iter()
        .all(|t| !t.exists && t.rows == 0));
}

#[test]
fn test_restock_on_empty_store_fails() {
    let mut store = Store::open_in_memory().unwrap();
    let plan = SeedPlan {
        today: Some(today()),
        ..SeedPlan::from_profile(Profile::Restock, 1)
    };

    assert!(Seeder::run(&mut store, &plan).is_err());
    assert_eq!(total_rows(&store), 0);
}

#[test]
fn test_empty_status_list_fails() {
    let mut store = Store::open_in_memory().unwrap();
    let plan = SeedPlan {
        delivery_statuses: Vec::new(),
        ..plan(SeedCounts {
            delivery_statuses: 2,
            ..Default::default()
        })
    };

    let err = Seeder::run(&mut store, &plan).unwrap_err();
    assert_eq!(
        err.downcast_ref::<GenError>(),
        Some(&GenError::EmptyStatusList)
    );
}

#[test]
fn test_dry_run_leaves_no_rows() {
    let mut store = Store::open_in_memory().unwrap();
    let plan = SeedPlan {
        dry_run: true,
        ..plan(small_counts())
    };

    let report = Seeder::run(&mut store, &plan).unwrap();
    assert!(report.dry_run);
    assert!(!report.committed);
    assert_eq!(report.total_rows, small_counts().total() as u64);
    assert_eq!(total_rows(&store), 0);
    assert!(!store.table_exists(schema::SALES).unwrap());
}

#[test]
fn test_dry_run_keeps_existing_schema_and_rows() {
    let mut store = Store::open_in_memory().unwrap();
    Seeder::run(&mut store, &plan(small_counts())).unwrap();

    let plan = SeedPlan {
        dry_run: true,
        ..plan(small_counts())
    };
    let report = Seeder::run(&mut store, &plan).unwrap();
    assert!(!report.committed);
    assert!(store.table_exists(schema::SALES).unwrap());
    assert_eq!(total_rows(&store), small_counts().total() as u64);
}

#[test]
fn test_seeded_data_properties() {
    let mut store = Store::open_in_memory().unwrap();
    Seeder::run(&mut store, &plan(small_counts())).unwrap();

    let statuses: HashMap<_, DeliveryStatus> = store
        .fetch_all::<DeliveryStatus>()
        .unwrap()
        .into_iter()
        .map(|s| (s.id, s.row))
        .collect();
    let prices: HashMap<_, f64> = store
        .fetch_all::<Product>()
        .unwrap()
        .into_iter()
        .map(|p| (p.id, p.row.unit_price))
        .collect();

    for product in prices.values() {
        assert!((10.0..=500.0).contains(product));
    }

    let sales = store.fetch_all::<Sale>().unwrap();
    assert_eq!(sales.len(), 150);
    for sale in &sales {
        let sale = &sale.row;
        assert!((1..=10).contains(&sale.quantity));
        assert_eq!(
            sale.delivered_on.is_some(),
            statuses[&sale.delivery_status_id].is_delivered()
        );
        let expected = round_cents(prices[&sale.product_id] * f64::from(sale.quantity));
        assert!((sale.amount - expected).abs() < 0.005);
    }

    let per_customer: usize = store
        .fetch_all::<Customer>()
        .unwrap()
        .iter()
        .map(|c| store.sales_for_customer(c.id).unwrap().len())
        .sum();
    assert_eq!(per_customer, sales.len());
}

#[test]
fn test_verify_after_seeding_is_clean() {
    let mut store = Store::open_in_memory().unwrap();
    Seeder::run(&mut store, &plan(small_counts())).unwrap();

    let report = verify(&store).unwrap();
    assert!(report.is_clean(), "{}", report);
    assert_eq!(report.sales_checked, 150);
}

#[test]
fn test_verify_requires_schema() {
    let store = Store::open_in_memory().unwrap();
    assert!(verify(&store).is_err());
}

#[test]
fn test_same_seed_reproduces_rows() {
    let counts = SeedCounts {
        customers: 5,
        products: 5,
        cashiers: 2,
        payment_methods: 2,
        delivery_statuses: 2,
        sales: 10,
    };
    let mut first = Store::open_in_memory().unwrap();
    let mut second = Store::open_in_memory().unwrap();
    Seeder::run(&mut first, &plan(counts)).unwrap();
    Seeder::run(&mut second, &plan(counts)).unwrap();

    assert_eq!(
        first.fetch_all::<Customer>().unwrap(),
        second.fetch_all::<Customer>().unwrap()
    );
    assert_eq!(
        first.fetch_all::<Sale>().unwrap(),
        second.fetch_all::<Sale>().unwrap()
    );
}

#[test]
fn test_english_locale_seeds() {
    let mut store = Store::open_in_memory().unwrap();
    let plan = SeedPlan {
        locale: Locale::En,
        ..plan(SeedCounts {
            customers: 3,
            ..Default::default()
        })
    };
    let report = Seeder::run(&mut store, &plan).unwrap();
    assert_eq!(report.locale, "en");
    assert_eq!(store.count(schema::CUSTOMERS).unwrap(), 3);
}

#[test]
fn test_restock_after_full_seed_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("loja.db");

    {
        let mut store = Store::open(&path).unwrap();
        Seeder::run(&mut store, &plan(small_counts())).unwrap();
    }

    let mut store = Store::open(&path).unwrap();
    let restock = SeedPlan {
        today: Some(today()),
        ..SeedPlan::from_profile(Profile::Restock, 7)
    };
    let report = Seeder::run(&mut store, &restock).unwrap();
    assert!(report.committed);
    assert_eq!(report.rows(schema::CASHIERS), 0);

    assert_eq!(store.count(schema::CUSTOMERS).unwrap(), 20 + 80);
    assert_eq!(store.count(schema::PRODUCTS).unwrap(), 30 + 400);
    assert_eq!(store.count(schema::CASHIERS).unwrap(), 5);
    assert_eq!(store.count(schema::SALES).unwrap(), 150 + 200);
    assert!(verify(&store).unwrap().is_clean());
}

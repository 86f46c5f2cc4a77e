//! Entity shapes for the store.
//!
//! Reference entities (customer, product, cashier, payment method, delivery
//! status) have no outgoing references. A [`Sale`] points at one row of each
//! through typed identifiers.

use crate::error::GenError;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Payment method label that carries a payment term.
pub const BOLETO: &str = "Boleto";

/// Payment method label that carries a cash discount.
pub const CASH: &str = "Dinheiro";

/// Delivery status label for which a sale records a delivery date.
pub const DELIVERED: &str = "Entregue";

/// Delivery statuses used when nothing else is configured.
pub const DEFAULT_DELIVERY_STATUSES: &[&str] = &["Em processamento", "Enviado", DELIVERED];

macro_rules! typed_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

typed_id!(
    /// Identifier of a row in `clientes`
    CustomerId
);
typed_id!(
    /// Identifier of a row in `produtos`
    ProductId
);
typed_id!(
    /// Identifier of a row in `caixas`
    CashierId
);
typed_id!(
    /// Identifier of a row in `formas_pagamento`
    PaymentMethodId
);
typed_id!(
    /// Identifier of a row in `status_entrega`
    DeliveryStatusId
);
typed_id!(
    /// Identifier of a row in `vendas`
    SaleId
);

/// A row read back from storage together with its assigned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Persisted<I, T> {
    pub id: I,
    pub row: T,
}

impl<I, T> Persisted<I, T> {
    pub fn new(id: I, row: T) -> Self {
        Self { id, row }
    }
}

fn parse_label<T: Copy>(
    all: &[T],
    label: impl Fn(T) -> &'static str,
    kind: &'static str,
    s: &str,
) -> Result<T, GenError> {
    all.iter()
        .copied()
        .find(|v| label(*v).eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| GenError::UnknownLabel {
            kind,
            label: s.to_string(),
        })
}

/// Market segment of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerSegment {
    Residential,
    Commercial,
    Industrial,
}

impl CustomerSegment {
    pub const ALL: [CustomerSegment; 3] = [
        CustomerSegment::Residential,
        CustomerSegment::Commercial,
        CustomerSegment::Industrial,
    ];

    /// Stored label
    pub fn label(self) -> &'static str {
        match self {
            CustomerSegment::Residential => "Residencial",
            CustomerSegment::Commercial => "Comercial",
            CustomerSegment::Industrial => "Industrial",
        }
    }
}

impl FromStr for CustomerSegment {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, "segment", s)
    }
}

impl fmt::Display for CustomerSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Channel a customer buys through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseChannel {
    PhysicalStore,
    Online,
}

impl PurchaseChannel {
    pub const ALL: [PurchaseChannel; 2] = [PurchaseChannel::PhysicalStore, PurchaseChannel::Online];

    pub fn label(self) -> &'static str {
        match self {
            PurchaseChannel::PhysicalStore => "Loja Física",
            PurchaseChannel::Online => "Online",
        }
    }
}

impl FromStr for PurchaseChannel {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, "purchase channel", s)
    }
}

impl fmt::Display for PurchaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit a product is sold in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitOfMeasure {
    Unit,
    Kilogram,
    Meter,
    SquareMeter,
    CubicMeter,
}

impl UnitOfMeasure {
    pub const ALL: [UnitOfMeasure; 5] = [
        UnitOfMeasure::Unit,
        UnitOfMeasure::Kilogram,
        UnitOfMeasure::Meter,
        UnitOfMeasure::SquareMeter,
        UnitOfMeasure::CubicMeter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            UnitOfMeasure::Unit => "UN",
            UnitOfMeasure::Kilogram => "KG",
            UnitOfMeasure::Meter => "M",
            UnitOfMeasure::SquareMeter => "M2",
            UnitOfMeasure::CubicMeter => "M3",
        }
    }
}

impl FromStr for UnitOfMeasure {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, "unit of measure", s)
    }
}

impl fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Role of a cashier at the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CashierRole {
    Cashier,
    Manager,
}

impl CashierRole {
    pub const ALL: [CashierRole; 2] = [CashierRole::Cashier, CashierRole::Manager];

    pub fn label(self) -> &'static str {
        match self {
            CashierRole::Cashier => "Caixa",
            CashierRole::Manager => "Gerente",
        }
    }
}

impl FromStr for CashierRole {
    type Err = GenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label(&Self::ALL, Self::label, "cashier role", s)
    }
}

impl fmt::Display for CashierRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A store customer
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub name: String,
    /// CPF or CNPJ
    pub tax_id: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub segment: CustomerSegment,
    pub channel: PurchaseChannel,
}

/// A product on the shelf
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub description: String,
    pub category: String,
    /// Price per unit, rounded to cents
    pub unit_price: f64,
    /// Seasonal demand factor in [0.8, 1.2]
    pub seasonal_weight: f64,
    pub unit: UnitOfMeasure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cashier {
    pub name: String,
    pub role: CashierRole,
    pub hired_on: NaiveDate,
}

/// A way of paying for a sale.
///
/// `term_days` is only non-zero for [`BOLETO`] and `discount` only for [`CASH`].
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethod {
    pub description: String,
    pub term_days: u32,
    /// Fraction of the amount, e.g. 0.05 for 5%
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryStatus {
    pub description: String,
}

impl DeliveryStatus {
    pub fn is_delivered(&self) -> bool {
        self.description == DELIVERED
    }
}

/// A sale of one product to one customer
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub customer_id: CustomerId,
    pub product_id: ProductId,
    pub sold_on: NaiveDate,
    /// Unit price times quantity, rounded to cents
    pub amount: f64,
    pub quantity: u32,
    pub payment_method_id: PaymentMethodId,
    pub delivery_status_id: DeliveryStatusId,
    /// Present only when the delivery status is [`DELIVERED`]
    pub delivered_on: Option<NaiveDate>,
    pub cashier_id: CashierId,
}

/// Round a currency amount to cents
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for segment in CustomerSegment::ALL {
            assert_eq!(segment.label().parse::<CustomerSegment>(), Ok(segment));
        }
        for unit in UnitOfMeasure::ALL {
            assert_eq!(unit.label().parse::<UnitOfMeasure>(), Ok(unit));
        }
        assert_eq!(
            "loja física".parse::<PurchaseChannel>(),
            Ok(PurchaseChannel::PhysicalStore)
        );
    }

    #[test]
    fn test_unknown_label() {
        let err = "Atacado".parse::<CustomerSegment>().unwrap_err();
        assert!(matches!(err, GenError::UnknownLabel { kind: "segment", .. }));
    }

    #[test]
    fn test_delivery_status_is_delivered() {
        let delivered = DeliveryStatus {
            description: DELIVERED.to_string(),
        };
        let shipped = DeliveryStatus {
            description: "Enviado".to_string(),
        };
        assert!(delivered.is_delivered());
        assert!(!shipped.is_delivered());
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(12.345_6), 12.35);
        assert_eq!(round_cents(3.0 * 19.99), 59.97);
    }
}

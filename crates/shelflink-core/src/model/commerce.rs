//! Commerce side entities: customers, orders, and sales tax rates
//!
//! These participate in CRUD and seeding only; none of them is a relation
//! owner or target, so the reconciliation layer never sees them.

use serde::{Deserialize, Serialize};

use super::Labeled;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// County-level sales tax rate applied to orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRate {
    pub id: i64,
    pub county: String,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRateDraft {
    pub county: String,
    pub rate: f64,
}

/// Customer order header; line items live in [`OrderItem`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    /// ISO-8601 date the order was placed
    pub placed_on: String,
    pub sales_rate_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_id: i64,
    pub placed_on: String,
    #[serde(default)]
    pub sales_rate_id: Option<i64>,
}

/// One book line within an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub book_id: i64,
    pub quantity: i64,
    /// Price per copy at order time, decoupled from the book's current price
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDraft {
    pub order_id: i64,
    pub book_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

impl Labeled for Customer {
    fn label(&self) -> &str {
        &self.name
    }
}

impl Labeled for SalesRate {
    fn label(&self) -> &str {
        &self.county
    }
}

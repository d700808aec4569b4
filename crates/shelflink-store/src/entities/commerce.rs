//! Entity impls for the commerce-side tables

use rusqlite::{Connection, Row, ToSql};
use shelflink_core::errors::Result;
use shelflink_core::model::{
    Customer, CustomerDraft, Order, OrderDraft, OrderItem, OrderItemDraft, SalesRate,
    SalesRateDraft,
};
use shelflink_core::rules;

use crate::entity::{Entity, EntityStore};
use crate::errors::from_rusqlite;

impl Entity for Customer {
    type Draft = CustomerDraft;

    const ENTITY: &'static str = "customer";
    const TABLE: &'static str = "customers";
    const COLUMNS: &'static [&'static str] = &["name", "email"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Customer {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
        })
    }

    fn bind(draft: &CustomerDraft) -> Vec<&dyn ToSql> {
        vec![&draft.name, &draft.email]
    }

    fn validate(draft: &CustomerDraft) -> Result<()> {
        rules::validate_label("name", &draft.name)
    }
}

impl Entity for SalesRate {
    type Draft = SalesRateDraft;

    const ENTITY: &'static str = "sales_rate";
    const TABLE: &'static str = "sales_rates";
    const COLUMNS: &'static [&'static str] = &["county", "rate"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(SalesRate {
            id: row.get(0)?,
            county: row.get(1)?,
            rate: row.get(2)?,
        })
    }

    fn bind(draft: &SalesRateDraft) -> Vec<&dyn ToSql> {
        vec![&draft.county, &draft.rate]
    }

    fn validate(draft: &SalesRateDraft) -> Result<()> {
        rules::validate_label("county", &draft.county)?;
        rules::validate_money("rate", draft.rate)
    }
}

impl Entity for Order {
    type Draft = OrderDraft;

    const ENTITY: &'static str = "order";
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static [&'static str] = &["customer_id", "placed_on", "sales_rate_id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Order {
            id: row.get(0)?,
            customer_id: row.get(1)?,
            placed_on: row.get(2)?,
            sales_rate_id: row.get(3)?,
        })
    }

    fn bind(draft: &OrderDraft) -> Vec<&dyn ToSql> {
        vec![&draft.customer_id, &draft.placed_on, &draft.sales_rate_id]
    }

    fn validate(draft: &OrderDraft) -> Result<()> {
        rules::validate_label("placed_on", &draft.placed_on)
    }
}

impl Entity for OrderItem {
    type Draft = OrderItemDraft;

    const ENTITY: &'static str = "order_item";
    const TABLE: &'static str = "order_items";
    const COLUMNS: &'static [&'static str] = &["order_id", "book_id", "quantity", "unit_price"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(OrderItem {
            id: row.get(0)?,
            order_id: row.get(1)?,
            book_id: row.get(2)?,
            quantity: row.get(3)?,
            unit_price: row.get(4)?,
        })
    }

    fn bind(draft: &OrderItemDraft) -> Vec<&dyn ToSql> {
        vec![
            &draft.order_id,
            &draft.book_id,
            &draft.quantity,
            &draft.unit_price,
        ]
    }

    fn validate(draft: &OrderItemDraft) -> Result<()> {
        rules::validate_count("quantity", draft.quantity)?;
        rules::validate_money("unit_price", draft.unit_price)
    }
}

/// Order store: generic CRUD plus the per-customer listing
#[derive(Clone, Default)]
pub struct OrderStore {
    pub base: EntityStore<Order>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            base: EntityStore::new(),
        }
    }

    /// All orders placed by one customer, oldest first
    pub fn for_customer(&self, conn: &Connection, customer_id: i64) -> Result<Vec<Order>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, customer_id, placed_on, sales_rate_id
                 FROM orders
                 WHERE customer_id = ?1
                 ORDER BY placed_on, id",
            )
            .map_err(|e| from_rusqlite("orders_for_customer", e))?;

        let orders = stmt
            .query_map([customer_id], |row| Order::from_row(row))
            .map_err(|e| from_rusqlite("orders_for_customer", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("orders_for_customer", e))?;
        Ok(orders)
    }
}

/// Order item store: generic CRUD plus the per-order listing
#[derive(Clone, Default)]
pub struct OrderItemStore {
    pub base: EntityStore<OrderItem>,
}

impl OrderItemStore {
    pub fn new() -> Self {
        Self {
            base: EntityStore::new(),
        }
    }

    /// Line items belonging to one order, ascending by id
    pub fn for_order(&self, conn: &Connection, order_id: i64) -> Result<Vec<OrderItem>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, order_id, book_id, quantity, unit_price
                 FROM order_items
                 WHERE order_id = ?1
                 ORDER BY id",
            )
            .map_err(|e| from_rusqlite("items_for_order", e))?;

        let items = stmt
            .query_map([order_id], |row| OrderItem::from_row(row))
            .map_err(|e| from_rusqlite("items_for_order", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| from_rusqlite("items_for_order", e))?;
        Ok(items)
    }
}

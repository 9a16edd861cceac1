//! In-memory entity store.
//!
//! RULE: Only store.rs owns the entity collections.
//! Stages borrow entities through store lookups — they never copy or
//! mutate them. Referential integrity (every transaction's customer and
//! every line item's product resolve) is a precondition of the upstream
//! source; a failed lookup surfaces as an error, not a panic.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    types::EntityId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: EntityId,
    pub name:       String,
    pub category:   String,
    pub price:      f64,
    pub cost:       f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: EntityId,
    pub age:         u32,
    pub gender:      String, // opaque to the engine
    pub channel:     String,
    pub join_date:   DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: EntityId,
    pub quantity:   u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: EntityId,
    pub customer_id:    EntityId,
    pub timestamp:      DateTime<Utc>,
    pub items:          Vec<LineItem>,
    /// Sum of price × quantity across items, rounded to cents.
    pub total:          f64,
    /// Copied from the customer at transaction time.
    pub channel:        String,
    pub campaign:       Option<String>,
}

pub struct EntityStore {
    products:       Vec<Product>,
    customers:      Vec<Customer>,
    transactions:   Vec<Transaction>,
    product_index:  HashMap<EntityId, usize>,
    customer_index: HashMap<EntityId, usize>,
}

impl EntityStore {
    pub fn new(
        products: Vec<Product>,
        customers: Vec<Customer>,
        transactions: Vec<Transaction>,
    ) -> Self {
        let product_index = products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.product_id.clone(), i))
            .collect();
        let customer_index = customers
            .iter()
            .enumerate()
            .map(|(i, c)| (c.customer_id.clone(), i))
            .collect();
        Self {
            products,
            customers,
            transactions,
            product_index,
            customer_index,
        }
    }

    pub fn product(&self, product_id: &str) -> AnalyticsResult<&Product> {
        self.product_index
            .get(product_id)
            .map(|&i| &self.products[i])
            .ok_or_else(|| AnalyticsError::UnknownProduct {
                product_id: product_id.to_string(),
            })
    }

    pub fn customer(&self, customer_id: &str) -> AnalyticsResult<&Customer> {
        self.customer_index
            .get(customer_id)
            .map(|&i| &self.customers[i])
            .ok_or_else(|| AnalyticsError::UnknownCustomer {
                customer_id: customer_id.to_string(),
            })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

//! Synthetic dataset generator — the upstream data source made concrete.
//!
//! Generation is fully deterministic for a given (config, seed): all
//! randomness flows through per-entity-kind streams from the RngBank,
//! and ids are sequential. The one engine invariant the generator
//! enforces is that no transaction precedes its customer's join date —
//! draws that land earlier are skipped, consuming the attempt.

use crate::{
    config::GeneratorConfig,
    error::AnalyticsResult,
    rng::{RngBank, StreamSlot},
    store::{Customer, LineItem, Product, Transaction},
    types::round_cents,
};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

/// Everything the upstream source hands the engine for one run.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub products:          Vec<Product>,
    pub customers:         Vec<Customer>,
    pub transactions:      Vec<Transaction>,
    pub reference_instant: DateTime<Utc>,
}

pub fn generate(config: &GeneratorConfig, seed: u64) -> AnalyticsResult<Dataset> {
    config.validate()?;
    let bank = RngBank::new(seed);

    let products = generate_products(config, &bank);
    let customers = generate_customers(config, &bank);
    let transactions = generate_transactions(config, &bank, &products, &customers);

    log::info!(
        "generator: seed={seed} produced {} products, {} customers, {} transactions",
        products.len(),
        customers.len(),
        transactions.len(),
    );

    Ok(Dataset {
        products,
        customers,
        transactions,
        reference_instant: config.reference_instant,
    })
}

fn generate_products(config: &GeneratorConfig, bank: &RngBank) -> Vec<Product> {
    let mut rng = bank.for_stream(StreamSlot::Products);
    let mut products = Vec::with_capacity(config.product_count);

    for i in 0..config.product_count {
        let price = round_cents(rng.next_f64_in(config.price_min, config.price_span));
        let cost = round_cents(
            price * rng.next_f64_in(config.cost_ratio_min, config.cost_ratio_span),
        );
        products.push(Product {
            product_id: format!("PROD{:04}", i + 1),
            name:       format!("Product {}", i + 1),
            category:   rng.pick(&config.categories).clone(),
            price,
            cost,
        });
    }
    products
}

fn generate_customers(config: &GeneratorConfig, bank: &RngBank) -> Vec<Customer> {
    let mut rng = bank.for_stream(StreamSlot::Customers);
    let mut customers = Vec::with_capacity(config.customer_count);

    for i in 0..config.customer_count {
        let month_offset = rng.next_u64_below(config.join_month_span as u64) as u32;
        let day = 1 + rng.next_u64_below(28) as u32;
        let gender = if rng.chance(0.5) { "M" } else { "F" };
        customers.push(Customer {
            customer_id: format!("CUST{:06}", i + 1),
            age:         18 + rng.next_u64_below(50) as u32,
            gender:      gender.to_string(),
            channel:     rng.pick(&config.channels).clone(),
            join_date:   month_start(config.join_epoch, month_offset) + Duration::days(day as i64 - 1),
        });
    }
    customers
}

fn generate_transactions(
    config: &GeneratorConfig,
    bank: &RngBank,
    products: &[Product],
    customers: &[Customer],
) -> Vec<Transaction> {
    let mut rng = bank.for_stream(StreamSlot::Orders);
    let window_secs = (config.window_end - config.window_start).num_seconds() as u64;
    let mut transactions = Vec::new();
    let mut skipped = 0usize;

    for i in 0..config.transaction_attempts {
        let customer = rng.pick(customers);
        let timestamp =
            config.window_start + Duration::seconds(rng.next_u64_below(window_secs) as i64);

        // A customer cannot transact before joining. The attempt is
        // consumed, so transaction ids keep gaps.
        if timestamp < customer.join_date {
            skipped += 1;
            continue;
        }

        let item_count = 1 + rng.next_u64_below(5) as usize;
        let mut items = Vec::with_capacity(item_count);
        let mut total = 0.0;
        for _ in 0..item_count {
            let product = rng.pick(products);
            let quantity = 1 + rng.next_u64_below(3) as u32;
            total += product.price * quantity as f64;
            items.push(LineItem {
                product_id: product.product_id.clone(),
                quantity,
            });
        }

        let campaign = if rng.chance(config.campaign_rate) {
            Some(rng.pick(&config.campaigns).clone())
        } else {
            None
        };

        transactions.push(Transaction {
            transaction_id: format!("ORD{:06}", i + 1),
            customer_id: customer.customer_id.clone(),
            timestamp,
            items,
            total: round_cents(total),
            channel: customer.channel.clone(),
            campaign,
        });
    }

    log::debug!(
        "generator: {} of {} transaction draws skipped (pre-join)",
        skipped,
        config.transaction_attempts,
    );
    transactions
}

/// First day of `epoch`'s month shifted forward by `offset` months.
fn month_start(epoch: DateTime<Utc>, offset: u32) -> DateTime<Utc> {
    let total = epoch.year() * 12 + epoch.month0() as i32 + offset as i32;
    let year = total.div_euclid(12);
    let month = total.rem_euclid(12) as u32 + 1;
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap()
}

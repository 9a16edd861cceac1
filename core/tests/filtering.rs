use chrono::{DateTime, Duration, TimeZone, Utc};
use shoppulse_core::{
    error::AnalyticsError,
    filter::{filter_transactions, CategoryFilter, DateRange},
    store::{Customer, EntityStore, LineItem, Product, Transaction},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn ts(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn product(id: &str, category: &str, price: f64) -> Product {
    Product {
        product_id: id.into(),
        name: format!("{id} name"),
        category: category.into(),
        price,
        cost: price / 2.0,
    }
}

fn customer(id: &str) -> Customer {
    Customer {
        customer_id: id.into(),
        age: 30,
        gender: "F".into(),
        channel: "Email".into(),
        join_date: ts(2023, 1, 1),
    }
}

fn txn(id: &str, customer_id: &str, when: DateTime<Utc>, items: Vec<LineItem>) -> Transaction {
    let total = items.iter().map(|i| 10.0 * i.quantity as f64).sum();
    Transaction {
        transaction_id: id.into(),
        customer_id: customer_id.into(),
        timestamp: when,
        items,
        total,
        channel: "Email".into(),
        campaign: None,
    }
}

fn item(product_id: &str, quantity: u32) -> LineItem {
    LineItem {
        product_id: product_id.into(),
        quantity,
    }
}

fn reference() -> DateTime<Utc> {
    ts(2024, 12, 31)
}

fn fixture() -> EntityStore {
    EntityStore::new(
        vec![
            product("P-TV", "Electronics", 100.0),
            product("P-BOOK", "Books", 20.0),
        ],
        vec![customer("C1"), customer("C2")],
        vec![
            txn("T1", "C1", ts(2023, 6, 1), vec![item("P-TV", 1)]),
            txn("T2", "C2", ts(2024, 10, 1), vec![item("P-BOOK", 2)]),
            txn("T3", "C1", ts(2024, 12, 15), vec![item("P-BOOK", 1), item("P-TV", 1)]),
        ],
    )
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// `All` excludes nothing and preserves input order.
#[test]
fn all_range_keeps_everything_in_order() {
    let store = fixture();
    let working =
        filter_transactions(&store, DateRange::All, &CategoryFilter::All, reference()).unwrap();

    let ids: Vec<&str> = working.iter().map(|t| t.transaction_id.as_str()).collect();
    assert_eq!(ids, vec!["T1", "T2", "T3"]);
}

/// Transactions strictly before the cutoff are excluded.
#[test]
fn last_30_days_excludes_older_transactions() {
    let store = fixture();
    let working = filter_transactions(
        &store,
        DateRange::Last30Days,
        &CategoryFilter::All,
        reference(),
    )
    .unwrap();

    let ids: Vec<&str> = working.iter().map(|t| t.transaction_id.as_str()).collect();
    assert_eq!(ids, vec!["T3"], "only the December transaction is recent enough");
}

/// A transaction exactly at the cutoff instant is kept.
#[test]
fn cutoff_boundary_is_inclusive() {
    let at_cutoff = reference() - Duration::days(30);
    let store = EntityStore::new(
        vec![product("P-TV", "Electronics", 100.0)],
        vec![customer("C1")],
        vec![txn("T1", "C1", at_cutoff, vec![item("P-TV", 1)])],
    );

    let working = filter_transactions(
        &store,
        DateRange::Last30Days,
        &CategoryFilter::All,
        reference(),
    )
    .unwrap();
    assert_eq!(working.len(), 1, "cutoff excludes strictly-before only");
}

/// Date ranges map to 30/90/365-day cutoffs.
#[test]
fn range_cutoffs_match_reference_offsets() {
    assert_eq!(DateRange::All.cutoff(reference()), None);
    assert_eq!(
        DateRange::Last90Days.cutoff(reference()),
        Some(reference() - Duration::days(90))
    );
    assert_eq!(
        DateRange::LastYear.cutoff(reference()),
        Some(reference() - Duration::days(365))
    );
}

/// A transaction passes the category filter if any line item matches.
#[test]
fn category_matches_any_line_item() {
    let store = fixture();
    let working = filter_transactions(
        &store,
        DateRange::All,
        &CategoryFilter::Only("Electronics".into()),
        reference(),
    )
    .unwrap();

    let ids: Vec<&str> = working.iter().map(|t| t.transaction_id.as_str()).collect();
    // T3 has one Books item and one Electronics item; one match is enough.
    assert_eq!(ids, vec!["T1", "T3"]);
}

/// An empty working set is a valid result, not an error.
#[test]
fn unmatched_category_yields_empty_working_set() {
    let store = fixture();
    let working = filter_transactions(
        &store,
        DateRange::All,
        &CategoryFilter::Only("Toys".into()),
        reference(),
    )
    .unwrap();
    assert!(working.is_empty());
}

/// A line item referencing a missing product surfaces a lookup error.
#[test]
fn unknown_product_reference_errors() {
    let store = EntityStore::new(
        vec![product("P-TV", "Electronics", 100.0)],
        vec![customer("C1")],
        vec![txn("T1", "C1", ts(2024, 6, 1), vec![item("P-MISSING", 1)])],
    );

    let result = filter_transactions(
        &store,
        DateRange::All,
        &CategoryFilter::Only("Electronics".into()),
        reference(),
    );
    assert!(
        matches!(&result, Err(AnalyticsError::UnknownProduct { product_id }) if product_id == "P-MISSING"),
        "expected UnknownProduct, got {result:?}"
    );
}

/// Date-range argument parsing for the runner.
#[test]
fn date_range_parses_cli_forms() {
    assert_eq!("all".parse::<DateRange>().unwrap(), DateRange::All);
    assert_eq!("30d".parse::<DateRange>().unwrap(), DateRange::Last30Days);
    assert_eq!("90d".parse::<DateRange>().unwrap(), DateRange::Last90Days);
    assert_eq!("1y".parse::<DateRange>().unwrap(), DateRange::LastYear);
    assert!("2w".parse::<DateRange>().is_err());
}

use shoppulse_core::{
    aggregation::{CategoryPerformance, MonthlyTrend},
    export::{render_report, write_report},
    snapshot::AnalyticsSnapshot,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn sample_snapshot() -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        monthly_trends: vec![
            MonthlyTrend {
                month: "2024-10".into(),
                revenue: 1500,
                orders: 12,
                customers: 9,
                aov: 125,
            },
            MonthlyTrend {
                month: "2024-11".into(),
                revenue: 2000,
                orders: 16,
                customers: 11,
                aov: 125,
            },
        ],
        category_performance: vec![CategoryPerformance {
            category: "Electronics".into(),
            revenue: 3000,
            units: 40,
            profit: 1200,
            margin: 40,
        }],
        ..AnalyticsSnapshot::empty()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Two sections separated by exactly one blank line, each with a title,
/// a header, and one row per entry.
#[test]
fn report_has_two_titled_sections() {
    let report = render_report(&sample_snapshot());
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Monthly Revenue Report",
            "Month,Revenue,Orders,Customers,AOV",
            "2024-10,1500,12,9,125",
            "2024-11,2000,16,11,125",
            "",
            "Category Performance",
            "Category,Revenue,Units,Profit,Margin",
            "Electronics,3000,40,1200,40%",
        ]
    );
}

/// Margin carries a `%` suffix; monthly values are plain integers.
#[test]
fn margin_rows_carry_percent_suffix() {
    let report = render_report(&sample_snapshot());
    let category_row = report.lines().last().unwrap();
    assert!(category_row.ends_with("40%"), "got {category_row}");

    let monthly_row = report.lines().nth(2).unwrap();
    assert!(
        monthly_row.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '-'),
        "monthly rows are plain integers: {monthly_row}"
    );
}

/// The empty snapshot still renders both sections, with no data rows.
#[test]
fn empty_snapshot_renders_headers_only() {
    let report = render_report(&AnalyticsSnapshot::empty());
    let lines: Vec<&str> = report.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Monthly Revenue Report",
            "Month,Revenue,Orders,Customers,AOV",
            "",
            "Category Performance",
            "Category,Revenue,Units,Profit,Margin",
        ]
    );
}

/// write_report emits the same bytes render_report produces.
#[test]
fn write_report_round_trips_through_a_writer() {
    let snapshot = sample_snapshot();
    let mut buffer: Vec<u8> = Vec::new();
    write_report(&snapshot, &mut buffer).unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), render_report(&snapshot));
}

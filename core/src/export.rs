//! CSV report export — the wire format consumed by the external writer.
//!
//! Two sections separated by one blank line, each with a one-line
//! title, a header row, and comma-separated rows. Values are emitted
//! unquoted; the generator config guarantees comma-free vocabularies.

use crate::{error::AnalyticsResult, snapshot::AnalyticsSnapshot};
use std::io::Write;

/// Render the two-section report document.
pub fn render_report(snapshot: &AnalyticsSnapshot) -> String {
    let mut out = String::new();

    out.push_str("Monthly Revenue Report\n");
    out.push_str("Month,Revenue,Orders,Customers,AOV\n");
    for row in &snapshot.monthly_trends {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            row.month, row.revenue, row.orders, row.customers, row.aov
        ));
    }

    out.push('\n');

    out.push_str("Category Performance\n");
    out.push_str("Category,Revenue,Units,Profit,Margin\n");
    for row in &snapshot.category_performance {
        out.push_str(&format!(
            "{},{},{},{},{}%\n",
            row.category, row.revenue, row.units, row.profit, row.margin
        ));
    }

    out
}

/// Write the rendered report to any writer.
pub fn write_report<W: Write>(snapshot: &AnalyticsSnapshot, writer: &mut W) -> AnalyticsResult<()> {
    writer.write_all(render_report(snapshot).as_bytes())?;
    Ok(())
}

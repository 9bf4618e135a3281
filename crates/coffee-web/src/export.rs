//! CSV export of the order history.

use anyhow::{Context, Result, anyhow};

use crate::db::OrderRow;

pub const CSV_HEADER: [&str; 3] = ["created", "price", "product_name"];

/// Render orders as CSV: one header line, then `created,price,product_name`
/// per order with prices in `W.FF` form.
pub fn orders_csv(orders: &[OrderRow]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for order in orders {
        writer.write_record([
            order.created.format("%Y-%m-%d %H:%M:%S").to_string(),
            order.price.to_string(),
            order.product_name.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

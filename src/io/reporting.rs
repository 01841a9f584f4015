// src/io/reporting.rs

use crate::error::InventoryResult;
use crate::simulation::metrics::RunSummary;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes serializable rows (period records, sweep rows, input records) as CSV.
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> InventoryResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes rows to a CSV file.
///
/// # Arguments
/// * `file_path` - Destination, e.g. "results/run_1.csv".
/// * `rows` - Records to export, one CSV row each.
pub fn write_simulation_log<P: AsRef<Path>, T: Serialize>(
    file_path: P,
    rows: &[T],
) -> InventoryResult<()> {
    let path = file_path.as_ref();
    let file = std::fs::File::create(path)?;
    write_csv(file, rows)?;
    info!(rows = rows.len(), path = %path.display(), "exported CSV");
    Ok(())
}

/// Human-readable summary of a run.
pub fn format_summary(summary: &RunSummary) -> String {
    let observed = &summary.observed;
    let projected = &summary.projected;

    let mut out = String::from("=== Service Summary ===\n");
    out.push_str(&format!(
        "Observed periods:   {} (stockouts: {}, lost units: {:.2}, below safety stock: {}, fill rate: {:.1}%)\n",
        observed.periods,
        observed.stockout_periods,
        observed.stockout_quantity,
        observed.below_safety_stock_periods,
        observed.fill_rate() * 100.0
    ));
    if projected.periods > 0 {
        out.push_str(&format!(
            "Projected periods:  {} (stockouts: {}, lost units: {:.2}, below safety stock: {})\n",
            projected.periods,
            projected.stockout_periods,
            projected.stockout_quantity,
            projected.below_safety_stock_periods
        ));
    }
    out.push_str(&format!(
        "Orders placed: {}, total ordered: {:.2}, average on-hand: {:.2}\n",
        summary.orders_placed, summary.total_ordered, summary.average_on_hand
    ));
    out
}

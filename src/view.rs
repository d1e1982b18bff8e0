//! Pure rendering of the three dashboard panels. No state, no I/O.

use crate::models::TopSourceRow;
use crate::poller::{ChartPoint, DashboardState};

pub fn render(state: &DashboardState) -> String {
    let mut out = String::new();
    out.push_str("Commlogs Dashboard\n");
    out.push_str("Live volume, error rate, and top source IPs\n\n");
    out.push_str("Logs per Minute\n");
    out.push_str(&volume_panel(&state.volume));
    out.push_str("\nError Rate (last 24h)\n");
    out.push_str(&error_panel(state.error_pct));
    out.push_str("\n\nTop Source IPs\n");
    out.push_str(&top_sources_table(&state.top_sources));
    out
}

pub fn volume_panel(points: &[ChartPoint]) -> String {
    if points.is_empty() {
        return "  (no data)\n".to_string();
    }
    points
        .iter()
        .map(|point| format!("  {}  {}\n", point.bucket, point.logs))
        .collect()
}

/// The error-rate readout, e.g. "3.25%".
pub fn error_panel(error_pct: f64) -> String {
    format!("{:.2}%", error_pct)
}

pub fn top_sources_table(rows: &[TopSourceRow]) -> String {
    let mut out = String::from("  Source IP        Count\n");
    for row in rows {
        out.push_str(&format!("  {:<15}  {}\n", row.src_ip, row.c));
    }
    out
}

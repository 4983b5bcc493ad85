//! Terminal rendering of a forecast report

use comfy_table::presets::UTF8_FULL;
use comfy_table::{CellAlignment, ContentArrangement, Table};
use trend_stock::{ForecastReport, StockError};

/// Table of projections, one row per symbol
pub fn predictions_table(report: &ForecastReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Symbol",
            "Closes",
            "Last price",
            "Alpha",
            "Beta",
            "Horizon (days)",
            "Predicted price",
        ]);

    for p in &report.predictions {
        let closes = report.series.get(&p.symbol).map_or(0, |s| s.prices.len());
        table.add_row(vec![
            p.symbol.to_string(),
            closes.to_string(),
            format!("{:.2}", p.last_price),
            format!("{:.6}", p.fit.alpha),
            format!("{:.6}", p.fit.beta),
            p.horizon_days.to_string(),
            format!("{:.2}", p.predicted_price),
        ]);
    }

    for index in 1..7 {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }

    table
}

/// Full report text
pub fn render(report: &ForecastReport) -> String {
    let mut out = predictions_table(report).to_string();
    if let Some(path) = &report.exported_to {
        out.push_str(&format!("\nSeries written to {}", path.display()));
    }
    if let Some(path) = &report.predictions_exported_to {
        out.push_str(&format!("\nPredictions written to {}", path.display()));
    }
    out
}

/// Suggestion printed next to a failed run, if there is one
pub fn failure_hint(err: &StockError) -> Option<&'static str> {
    if err.is_network() {
        return Some("check network connectivity, or raise --timeout for a slow endpoint");
    }
    match err {
        StockError::ApiError { .. } => Some(
            "check the API key (ALPHA_VANTAGE_API_KEY) and the symbol; the free tier is also rate limited",
        ),
        StockError::DegenerateInput(_) => {
            Some("the fit had no variance to work with; try --model day-index")
        }
        _ => None,
    }
}

//! Fixed-width table rendering for the terminal.
//!
//! Columns are centered in 11-character cells under the unit headers
//! engineers expect from printed property tables.

use crate::domain::{CategorySummary, MaterialRecord};

const COLUMN_WIDTH: usize = 11;

const PROPERTY_HEADERS: [&str; 6] = [
    "\u{03c1}(kg/m\u{00b3})", // ρ(kg/m³)
    "E(GPa)",
    "G(GPa)",
    "\u{03c3}y(MPa)",   // σy(MPa)
    "\u{03c3}ult(MPa)", // σult(MPa)
    "%EL",
];

/// Render materials from the properties view as a table.
pub fn render_materials(records: &[MaterialRecord]) -> String {
    if records.is_empty() {
        return "No materials\n".to_string();
    }

    let mut headers = vec!["Material", "Category"];
    headers.extend(PROPERTY_HEADERS);

    let mut out = header_row(&headers);
    for record in records {
        let mut cells = vec![record.material.clone(), record.category.clone()];
        cells.extend(record.properties.values().map(format_value));
        out.push_str(&row(&cells));
    }
    out.push_str(&spacer(headers.len()));
    out
}

/// Render category summaries (counts and property means) as a table.
pub fn render_summaries(summaries: &[CategorySummary]) -> String {
    if summaries.is_empty() {
        return "No categories\n".to_string();
    }

    let mut headers = vec!["Category", "Materials"];
    headers.extend(PROPERTY_HEADERS);

    let mut out = header_row(&headers);
    for summary in summaries {
        let mut cells = vec![summary.category.clone(), summary.materials.to_string()];
        cells.extend(summary.means.values().map(format_value));
        out.push_str(&row(&cells));
    }
    out.push_str(&spacer(headers.len()));
    out
}

fn header_row(headers: &[&str]) -> String {
    let mut out = row(headers);
    out.push_str(&spacer(headers.len()));
    out
}

fn row<S: AsRef<str>>(cells: &[S]) -> String {
    let mut line = String::new();
    for cell in cells {
        line.push_str(&center(cell.as_ref()));
    }
    line.push('\n');
    line
}

fn spacer(columns: usize) -> String {
    format!("{}\n", "-".repeat(COLUMN_WIDTH * columns))
}

fn center(text: &str) -> String {
    // Width is in chars; good enough for these headers.
    let len = text.chars().count();
    if len >= COLUMN_WIDTH {
        return text.to_string();
    }
    let pad = COLUMN_WIDTH - len;
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
}

fn format_value(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        // Round to at most two decimals, dropping a trailing ".00".
        Some(v) if (v - v.round()).abs() < 1e-9 => format!("{:.0}", v.round()),
        Some(v) => format!("{v:.2}"),
    }
}

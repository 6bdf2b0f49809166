use crate::domain::model::{GdpTable, RawTable, Table, GDP_BILLIONS_COLUMN};
use crate::utils::error::{EtlError, Result};

const THOUSANDS_SEPARATOR: char = ',';
const DECIMAL_PLACES: i32 = 2;

/// Rounds half-to-even on the scaled value, the same way numpy's `round`
/// treats IEEE-754 doubles: `2.125` becomes `2.12`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// `"26,854,599"` (millions) → `26854.6` (billions).
pub fn millions_to_billions(raw: &str) -> Result<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != THOUSANDS_SEPARATOR).collect();
    let cleaned = cleaned.trim();

    if !is_plain_decimal(cleaned) {
        return Err(EtlError::NumberParse {
            value: raw.to_string(),
            reason: "expected digits with optional thousands separators".to_string(),
        });
    }

    let millions: f64 = cleaned.parse().map_err(|e: std::num::ParseFloatError| {
        EtlError::NumberParse {
            value: raw.to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(round_to(millions / 1000.0, DECIMAL_PLACES))
}

/// Optional sign, at least one digit, at most one decimal point. Rejects
/// forms `f64::from_str` would otherwise accept such as `inf` or `1e5`.
fn is_plain_decimal(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    let mut seen_digit = false;
    let mut seen_point = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Converts every GDP value and renames the column. Stops at the first value
/// that does not parse.
pub fn transform_table(table: RawTable) -> Result<GdpTable> {
    let [country_column, _] = table.columns;
    let mut transformed = Table::new([country_column, GDP_BILLIONS_COLUMN.to_string()]);

    for record in table.records {
        let billions = millions_to_billions(&record.gdp)?;
        transformed.push(record.country, billions);
    }

    Ok(transformed)
}

use std::fmt;

pub const COUNTRY_COLUMN: &str = "Country";
pub const GDP_MILLIONS_COLUMN: &str = "GDP_USD_millions";
pub const GDP_BILLIONS_COLUMN: &str = "GDP_USD_billions";

#[derive(Debug, Clone, PartialEq)]
pub struct Record<V> {
    pub country: String,
    pub gdp: V,
}

/// Two-column table; rows keep document order and are never deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<V> {
    pub columns: [String; 2],
    pub records: Vec<Record<V>>,
}

/// GDP still as the page's formatted text, in millions.
pub type RawTable = Table<String>;

/// GDP in billions, rounded to two decimals.
pub type GdpTable = Table<f64>;

impl<V> Table<V> {
    pub fn new(columns: [String; 2]) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn push(&mut self, country: impl Into<String>, gdp: V) {
        self.records.push(Record {
            country: country.into(),
            gdp,
        });
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A single cell of a query result, keyed on SQLite's storage class.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SqlValue::Integer(i) => Some(*i as f64),
            SqlValue::Real(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, SqlValue::Integer(_) | SqlValue::Real(_))
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => write!(f, "None"),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::Real(r) => write!(f, "{}", format_decimal(*r)),
            SqlValue::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<SqlValue>>,
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders as an aligned text table with a leading row index. Numbers are
/// right-aligned, text is left-aligned.
impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            writeln!(f, "Empty result")?;
            return writeln!(f, "Columns: [{}]", self.columns.join(", "));
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        let index_width = (self.rows.len() - 1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i).map(String::len))
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:width$}", "", width = index_width)?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", name, width = *width)?;
        }
        writeln!(f)?;

        for (index, (row, rendered)) in self.rows.iter().zip(&cells).enumerate() {
            write!(f, "{:<width$}", index, width = index_width)?;
            for ((value, text), width) in row.iter().zip(rendered).zip(&widths) {
                if value.is_numeric() {
                    write!(f, "  {:>width$}", text, width = *width)?;
                } else {
                    write!(f, "  {:<width$}", text, width = *width)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Whole numbers keep one decimal (`100.0`), everything else uses the
/// shortest round-tripping form.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

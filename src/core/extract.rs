//! Pulls the (Country, GDP) rows out of the page markup.
//!
//! Rules applied to every `tr` of the chosen `tbody`:
//! - rows without `td` cells (headers, separators) are skipped
//! - the first cell must contain a link (the country name)
//! - the third cell must not be the `—` placeholder used for missing data

use crate::config::TableLocator;
use crate::domain::model::RawTable;
use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};

/// Marker the page uses in place of a missing GDP figure.
pub const MISSING_DATA_MARKER: &str = "—";

const TBODY_SELECTOR_STR: &str = "tbody";
const ROW_SELECTOR_STR: &str = "tr";
const CELL_SELECTOR_STR: &str = "td";
const HEADER_CELL_SELECTOR_STR: &str = "th";
const LINK_SELECTOR_STR: &str = "a";

const COUNTRY_CELL: usize = 0;
const GDP_CELL: usize = 2;

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| EtlError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

struct Selectors {
    tbody: Selector,
    row: Selector,
    cell: Selector,
    header_cell: Selector,
    link: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            tbody: selector(TBODY_SELECTOR_STR)?,
            row: selector(ROW_SELECTOR_STR)?,
            cell: selector(CELL_SELECTOR_STR)?,
            header_cell: selector(HEADER_CELL_SELECTOR_STR)?,
            link: selector(LINK_SELECTOR_STR)?,
        })
    }
}

pub fn extract_table(
    markup: &str,
    columns: &[String; 2],
    locator: &TableLocator,
) -> Result<RawTable> {
    let selectors = Selectors::new()?;
    let document = Html::parse_document(markup);

    let bodies: Vec<ElementRef> = document.select(&selectors.tbody).collect();
    tracing::debug!("Found {} tbody elements", bodies.len());

    let body = locate_table(&bodies, locator, &selectors)?;

    let mut table = RawTable::new(columns.clone());
    let mut skipped = 0;
    for (row_index, row) in body.select(&selectors.row).enumerate() {
        let cells: Vec<ElementRef> = row.select(&selectors.cell).collect();
        if cells.is_empty() {
            continue;
        }

        let Some(link) = cells[COUNTRY_CELL].select(&selectors.link).next() else {
            skipped += 1;
            continue;
        };

        let gdp_cell = cells.get(GDP_CELL).ok_or(EtlError::MissingCell {
            row: row_index,
            expected: GDP_CELL + 1,
            found: cells.len(),
        })?;

        let gdp = first_text(gdp_cell);
        if gdp == MISSING_DATA_MARKER {
            skipped += 1;
            continue;
        }

        let country = cell_text(&link);
        tracing::trace!("Row {}: {} = {}", row_index, country, gdp);
        table.push(country, gdp);
    }

    tracing::debug!("Kept {} rows, skipped {}", table.len(), skipped);
    Ok(table)
}

fn locate_table<'a>(
    bodies: &[ElementRef<'a>],
    locator: &TableLocator,
    selectors: &Selectors,
) -> Result<ElementRef<'a>> {
    let found = match locator {
        TableLocator::Position(index) => bodies.get(*index).copied(),
        TableLocator::HeaderText(needle) => {
            let needle = needle.to_lowercase();
            bodies.iter().copied().find(|body| {
                body.select(&selectors.header_cell)
                    .any(|th| cell_text(&th).to_lowercase().contains(&needle))
            })
        }
    };

    found.ok_or_else(|| EtlError::TableNotFound {
        locator: locator.to_string(),
        found: bodies.len(),
    })
}

fn cell_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// First non-blank text node, so trailing footnote markers are ignored.
fn first_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> [String; 2] {
        ["Country".to_string(), "GDP_USD_millions".to_string()]
    }

    fn page(data_rows: &str) -> String {
        format!(
            r#"<html><body>
<table><tbody><tr><td>navigation</td></tr></tbody></table>
<table><tbody><tr><td><a href="/legend">Legend</a></td><td>x</td><td>1</td></tr></tbody></table>
<table class="wikitable">
<tbody>
<tr><th>Country/Territory</th><th>UN region</th><th>IMF estimate</th></tr>
{}
</tbody>
</table>
</body></html>"#,
            data_rows
        )
    }

    #[test]
    fn test_third_tbody_is_used_and_placeholders_dropped() {
        let markup = page(
            r#"
<tr><td><a href="/wiki/United_States">United States</a></td><td>Americas</td><td>26,854,599</td></tr>
<tr><td><a href="/wiki/Russia">Russia</a></td><td>Europe</td><td>—</td></tr>
<tr><td><a href="/wiki/Tuvalu">Tuvalu</a></td><td>Oceania</td><td>63</td></tr>
"#,
        );

        let table = extract_table(&markup, &columns(), &TableLocator::Position(2)).unwrap();

        assert_eq!(table.columns, columns());
        assert_eq!(table.len(), 2);
        assert_eq!(table.records[0].country, "United States");
        assert_eq!(table.records[0].gdp, "26,854,599");
        assert_eq!(table.records[1].country, "Tuvalu");
        assert_eq!(table.records[1].gdp, "63");
    }

    #[test]
    fn test_row_count_matches_filters() {
        let markup = page(
            r#"
<tr></tr>
<tr><td>World</td><td>-</td><td>104,476,432</td></tr>
<tr><td><a href="/wiki/China">China</a></td><td>Asia</td><td>19,373,586</td></tr>
<tr><td><a href="/wiki/Germany">Germany</a></td><td>Europe</td><td>4,308,854</td></tr>
<tr><td><a href="/wiki/Syria">Syria</a></td><td>Asia</td><td> — </td></tr>
"#,
        );

        let table = extract_table(&markup, &columns(), &TableLocator::Position(2)).unwrap();
        let countries: Vec<&str> = table.records.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(countries, vec!["China", "Germany"]);
    }

    #[test]
    fn test_footnote_after_value_is_ignored() {
        let markup = page(
            r#"<tr><td><span class="flag"></span> <a href="/wiki/India">India</a></td><td>Asia</td><td>3,736,882<sup>[n 1]</sup></td></tr>"#,
        );

        let table = extract_table(&markup, &columns(), &TableLocator::Position(2)).unwrap();
        assert_eq!(table.records[0].country, "India");
        assert_eq!(table.records[0].gdp, "3,736,882");
    }

    #[test]
    fn test_placeholder_with_footnote_is_dropped() {
        let markup = page(
            r#"
<tr><td><a href="/wiki/China">China</a></td><td>Asia</td><td>19,373,586</td></tr>
<tr><td><a href="/wiki/Syria">Syria</a></td><td>Asia</td><td>—<sup>[n 1]</sup></td></tr>
"#,
        );

        let table = extract_table(&markup, &columns(), &TableLocator::Position(2)).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].country, "China");
        assert_eq!(table.records[0].gdp, "19,373,586");
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let markup = "<table><tbody><tr><td>only</td></tr></tbody></table>";
        let result = extract_table(markup, &columns(), &TableLocator::Position(2));
        match result {
            Err(EtlError::TableNotFound { found, .. }) => assert_eq!(found, 1),
            other => panic!("expected TableNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_linked_row_without_gdp_cell_is_fatal() {
        let markup = page(r#"<tr><td><a href="/wiki/Nauru">Nauru</a></td><td>Oceania</td></tr>"#);
        let result = extract_table(&markup, &columns(), &TableLocator::Position(2));
        assert!(matches!(
            result,
            Err(EtlError::MissingCell {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_header_text_locator_finds_table_regardless_of_position() {
        let markup = page(
            r#"<tr><td><a href="/wiki/Japan">Japan</a></td><td>Asia</td><td>4,409,738</td></tr>"#,
        );

        let locator = TableLocator::HeaderText("imf ESTIMATE".to_string());
        let table = extract_table(&markup, &columns(), &locator).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].country, "Japan");

        let missing = TableLocator::HeaderText("World Bank".to_string());
        assert!(matches!(
            extract_table(&markup, &columns(), &missing),
            Err(EtlError::TableNotFound { .. })
        ));
    }
}

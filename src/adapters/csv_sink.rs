use crate::domain::model::{format_decimal, GdpTable, Table};
use crate::domain::ports::Storage;
use crate::utils::error::{EtlError, Result};

/// Header row plus one line per record. No index column.
pub fn encode_table(table: &GdpTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns)?;
    for record in &table.records {
        writer.write_record([record.country.as_str(), format_decimal(record.gdp).as_str()])?;
    }
    writer.into_inner().map_err(|e| EtlError::Io(e.into_error()))
}

pub fn decode_table(data: &[u8]) -> Result<GdpTable> {
    let mut reader = csv::Reader::from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.len() != 2 {
        return Err(EtlError::CsvLayout {
            message: format!("expected 2 columns, found {}", headers.len()),
        });
    }
    let mut table = Table::new([headers[0].to_string(), headers[1].to_string()]);

    for row in reader.records() {
        let row = row?;
        let value = row[1].trim();
        let gdp: f64 = value.parse().map_err(|e: std::num::ParseFloatError| EtlError::NumberParse {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        table.push(&row[0], gdp);
    }

    Ok(table)
}

/// Creates or overwrites the file at `path`.
pub async fn write_csv_table<S: Storage>(storage: &S, path: &str, table: &GdpTable) -> Result<()> {
    let data = encode_table(table)?;
    tracing::debug!("Writing CSV ({} bytes, {} rows) to {}", data.len(), table.len(), path);
    storage.write_file(path, &data).await
}

pub async fn read_csv_table<S: Storage>(storage: &S, path: &str) -> Result<GdpTable> {
    let data = storage.read_file(path).await?;
    decode_table(&data)
}

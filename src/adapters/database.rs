use crate::domain::model::{GdpTable, QueryResult, SqlValue};
use crate::utils::error::Result;
use crate::utils::validation::validate_sql_identifier;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Executor, Row, Statement, TypeInfo, ValueRef};
use std::path::Path;

/// A single SQLite connection, opened once per run and closed explicitly.
#[derive(Debug, Clone)]
pub struct GdpDatabase {
    pool: SqlitePool,
}

impl GdpDatabase {
    /// Opens (or creates) the database file.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        tracing::debug!("Connected to SQLite database at {}", path.as_ref().display());
        Ok(Self { pool })
    }

    /// Drops any existing table called `name` and recreates it from `table`.
    ///
    /// Statements run one by one outside a transaction; a failure part way
    /// through leaves whatever was already written.
    pub async fn replace_table(&self, table: &GdpTable, name: &str) -> Result<u64> {
        validate_sql_identifier("table_name", name)?;
        let [country_column, gdp_column] = &table.columns;
        validate_sql_identifier("columns", country_column)?;
        validate_sql_identifier("columns", gdp_column)?;

        sqlx::query(&format!("DROP TABLE IF EXISTS \"{}\"", name))
            .execute(&self.pool)
            .await?;

        sqlx::query(&format!(
            "CREATE TABLE \"{}\" (\"{}\" TEXT, \"{}\" REAL)",
            name, country_column, gdp_column
        ))
        .execute(&self.pool)
        .await?;

        let insert = format!(
            "INSERT INTO \"{}\" (\"{}\", \"{}\") VALUES (?, ?)",
            name, country_column, gdp_column
        );
        let mut inserted = 0;
        for record in &table.records {
            inserted += sqlx::query(&insert)
                .bind(&record.country)
                .bind(record.gdp)
                .execute(&self.pool)
                .await?
                .rows_affected();
        }

        tracing::debug!("Replaced table {} with {} rows", name, inserted);
        Ok(inserted)
    }

    /// Runs `sql` verbatim. The statement is not parameterized, so it must
    /// never carry outside input.
    pub async fn run_query(&self, sql: &str) -> Result<QueryResult> {
        let statement = (&self.pool).prepare(sql).await?;
        let columns = statement
            .columns()
            .iter()
            .map(|column| column.name().to_string())
            .collect();

        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>>>()?;

        Ok(QueryResult { columns, rows })
    }

    pub async fn row_count(&self, name: &str) -> Result<i64> {
        validate_sql_identifier("table_name", name)?;
        let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM \"{}\"", name))
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn close(self) {
        self.pool.close().await;
        tracing::debug!("SQLite connection closed");
    }
}

fn decode_row(row: &SqliteRow) -> Result<Vec<SqlValue>> {
    let mut values = Vec::with_capacity(row.len());
    for index in 0..row.len() {
        let (is_null, type_name) = {
            let raw = row.try_get_raw(index)?;
            (raw.is_null(), raw.type_info().name().to_string())
        };

        let value = if is_null {
            SqlValue::Null
        } else {
            match type_name.as_str() {
                "INTEGER" | "BIGINT" | "INT8" | "BOOLEAN" => SqlValue::Integer(row.try_get(index)?),
                "REAL" | "NUMERIC" => SqlValue::Real(row.try_get(index)?),
                "BLOB" => {
                    let bytes: Vec<u8> = row.try_get(index)?;
                    SqlValue::Text(format!("<{} bytes>", bytes.len()))
                }
                _ => SqlValue::Text(row.try_get(index)?),
            }
        };
        values.push(value);
    }
    Ok(values)
}

use crate::adapters::database::GdpDatabase;
use crate::domain::model::QueryResult;
use crate::utils::error::Result;

/// Prints the statement, runs it and prints the rows.
pub async fn run_query(db: &GdpDatabase, statement: &str) -> Result<QueryResult> {
    let result = db.run_query(statement).await?;
    print!("{}", format_query_output(statement, &result));
    tracing::debug!("Query returned {} rows", result.len());
    Ok(result)
}

/// What a run writes to stdout: the statement on its own line, then the table.
pub fn format_query_output(statement: &str, result: &QueryResult) -> String {
    format!("{}\n{}", statement, result)
}

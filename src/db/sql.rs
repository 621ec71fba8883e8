use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::db::session::{Session, Transaction};
use crate::error::{Error, Result};
use crate::utils::instrument::logged;

/// Run a whole script inside one transaction.  Commit if every statement
/// succeeds, otherwise roll back and return [`Error::ScriptExecution`].
pub fn execute_sql<S: Session>(session: &mut S, sql: &str) -> Result<()> {
    debug!("executing sql:\n{}", sql);
    let mut tx = session.begin().map_err(Error::script)?;
    if let Err(e) = tx.batch_execute(sql) {
        match tx.rollback() {
            Ok(()) => info!("transaction rolled back"),
            Err(re) => warn!("rollback failed: {}", re),
        }
        return Err(Error::script(e));
    }
    tx.commit().map_err(Error::script)
}

/// Read a sql file and run it with [`execute_sql`].  If the file can't be
/// read no transaction is started.
pub fn execute_sql_file<S: Session>(session: &mut S, path: &Path) -> Result<()> {
    logged(&format!("execute_sql_file {}", path.display()), || {
        let sql = fs::read_to_string(path)
            .map_err(|e| Error::script(format!("failed to read {}: {}", path.display(), e)))?;
        execute_sql(session, &sql)
    })
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Number of rows in `schema.table`.  Read only, no transaction.
pub fn row_count<S: Session>(session: &mut S, schema: &str, table: &str) -> Result<i64> {
    let query = format!(
        "SELECT COUNT(*) FROM {}.{}",
        quote_identifier(schema),
        quote_identifier(table)
    );
    session
        .query_i64(&query)
        .map_err(|e| Error::query(&query, e))
}

use crate::error::Cause;

/// An open transaction.  Consumed by exactly one of `commit` or `rollback`.
pub trait Transaction {
    /// Run several statements, separated by `;`, as one batch.
    fn batch_execute(&mut self, sql: &str) -> Result<(), Cause>;
    fn commit(self) -> Result<(), Cause>;
    fn rollback(self) -> Result<(), Cause>;
}

/// A live database connection, the driver seam of the crate.
pub trait Session {
    type Tx<'a>: Transaction
    where
        Self: 'a;

    fn begin(&mut self) -> Result<Self::Tx<'_>, Cause>;

    /// Run a query returning a single integer.
    fn query_i64(&mut self, sql: &str) -> Result<i64, Cause>;

    /// Cheapest possible round trip to the server.
    fn ping(&mut self) -> Result<(), Cause>;
}

impl Session for postgres::Client {
    type Tx<'a> = postgres::Transaction<'a>;

    fn begin(&mut self) -> Result<postgres::Transaction<'_>, Cause> {
        Ok(self.transaction()?)
    }

    fn query_i64(&mut self, sql: &str) -> Result<i64, Cause> {
        let row = self.query_one(sql, &[])?;
        Ok(row.try_get::<_, i64>(0)?)
    }

    fn ping(&mut self) -> Result<(), Cause> {
        self.simple_query("SELECT 1")?;
        Ok(())
    }
}

impl Transaction for postgres::Transaction<'_> {
    fn batch_execute(&mut self, sql: &str) -> Result<(), Cause> {
        postgres::Transaction::batch_execute(self, sql)?;
        Ok(())
    }

    fn commit(self) -> Result<(), Cause> {
        postgres::Transaction::commit(self)?;
        Ok(())
    }

    fn rollback(self) -> Result<(), Cause> {
        postgres::Transaction::rollback(self)?;
        Ok(())
    }
}

impl Session for duckdb::Connection {
    type Tx<'a> = duckdb::Transaction<'a>;

    fn begin(&mut self) -> Result<duckdb::Transaction<'_>, Cause> {
        Ok(self.transaction()?)
    }

    fn query_i64(&mut self, sql: &str) -> Result<i64, Cause> {
        Ok(self.query_row(sql, [], |row| row.get::<usize, i64>(0))?)
    }

    fn ping(&mut self) -> Result<(), Cause> {
        self.query_row("SELECT 1", [], |row| row.get::<usize, i32>(0))?;
        Ok(())
    }
}

impl Transaction for duckdb::Transaction<'_> {
    fn batch_execute(&mut self, sql: &str) -> Result<(), Cause> {
        self.execute_batch(sql)?;
        Ok(())
    }

    fn commit(self) -> Result<(), Cause> {
        duckdb::Transaction::commit(self)?;
        Ok(())
    }

    fn rollback(self) -> Result<(), Cause> {
        duckdb::Transaction::rollback(self)?;
        Ok(())
    }
}

use log::info;
use postgres::{Client, NoTls};

use crate::db::config::DbConfig;
use crate::db::session::Session;
use crate::error::{Error, Result};
use crate::utils::instrument::logged;

/// Open a Postgres connection and make sure it answers before handing it out.
/// Missing credentials, a failed connection and a failed probe are all
/// reported as [`Error::Connection`].  Credentials are checked before any
/// network call is made.
pub fn open_connection(config: &DbConfig) -> Result<Client> {
    logged("open_connection", || {
        let (user, name) = config.validate()?;
        info!("connecting to {}", config.redacted_connection_string()?);

        let mut pg = postgres::Config::new();
        pg.user(user)
            .host(&config.host)
            .port(config.port)
            .dbname(name)
            .connect_timeout(config.connect_timeout);
        if let Some(password) = &config.password {
            pg.password(password);
        }
        let mut client = pg.connect(NoTls).map_err(Error::connection)?;
        ping(&mut client)?;
        Ok(client)
    })
}

/// Open a DuckDB file, or an in-memory database for `:memory:`.
pub fn open_duckdb(path: &str) -> Result<duckdb::Connection> {
    logged("open_duckdb", || {
        let mut conn = if path == ":memory:" {
            duckdb::Connection::open_in_memory()
        } else {
            duckdb::Connection::open(path)
        }
        .map_err(Error::connection)?;
        ping(&mut conn)?;
        Ok(conn)
    })
}

/// Liveness probe, `SELECT 1`.
pub fn ping<S: Session>(session: &mut S) -> Result<()> {
    session.ping().map_err(Error::connection)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::error::Cause;

    #[test]
    fn missing_user_fails_before_connecting() {
        let config = DbConfig {
            user: None,
            name: Some("tripdata".to_string()),
            // nothing listens here, a network attempt would hang until the timeout
            host: "10.255.255.1".to_string(),
            connect_timeout: Duration::from_secs(20),
            ..DbConfig::default()
        };
        let start = Instant::now();
        let err = open_connection(&config).err().unwrap();
        assert!(matches!(err, Error::Connection(_)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn missing_database_name() {
        let config = DbConfig {
            user: Some("citibike".to_string()),
            ..DbConfig::default()
        };
        assert!(matches!(open_connection(&config), Err(Error::Connection(_))));
    }

    /// A connection that was accepted but stopped answering.
    struct Unresponsive;

    impl Session for Unresponsive {
        type Tx<'a> = duckdb::Transaction<'a>;

        fn begin(&mut self) -> std::result::Result<duckdb::Transaction<'_>, Cause> {
            Err("server closed the connection unexpectedly".into())
        }

        fn query_i64(&mut self, _sql: &str) -> std::result::Result<i64, Cause> {
            Err("server closed the connection unexpectedly".into())
        }

        fn ping(&mut self) -> std::result::Result<(), Cause> {
            Err("server closed the connection unexpectedly".into())
        }
    }

    #[test]
    fn failed_liveness_check() {
        match ping(&mut Unresponsive) {
            Err(Error::Connection(source)) => {
                assert!(source.to_string().contains("server closed"))
            }
            res => panic!("unexpected result {:?}", res),
        }
    }

    #[test]
    fn open_in_memory_duckdb() -> Result<()> {
        let mut conn = open_duckdb(":memory:")?;
        ping(&mut conn)
    }

    #[test]
    fn unreachable_server() {
        let config = DbConfig {
            user: Some("citibike".to_string()),
            name: Some("tripdata".to_string()),
            port: 1,
            connect_timeout: Duration::from_secs(2),
            ..DbConfig::default()
        };
        assert!(matches!(open_connection(&config), Err(Error::Connection(_))));
    }

    #[ignore]
    #[test]
    fn connect_from_env() -> Result<()> {
        dotenvy::from_path(std::path::Path::new(".env/test.env")).unwrap();
        let mut client = open_connection(&DbConfig::from_env()?)?;
        ping(&mut client)
    }
}

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::{error, info, warn};
use tripdata::db::config::DbConfig;
use tripdata::db::connection::{open_connection, open_duckdb};
use tripdata::db::session::Session;
use tripdata::db::sql::{execute_sql_file, row_count};
use tripdata::error::report;
use tripdata::utils::logging;

/// Run sql files against the trip data database, each file in its own
/// transaction.  Stops at the first file that fails.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Environment name, e.g., test, prod.  Reads `.env/{env}.env`
    #[arg(short, long, default_value = "prod")]
    env: String,

    /// Use this DuckDB file instead of the Postgres database from `DB_*`
    #[arg(long)]
    duckdb: Option<String>,

    /// Report the number of rows of this table when done, e.g. `public.trips`.
    /// Without a schema, `public` (`main` for DuckDB)
    #[arg(long)]
    row_count: Option<String>,

    /// Also write the log to a daily file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn run<S: Session>(
    session: &mut S,
    files: &[PathBuf],
    table: Option<&str>,
    default_schema: &str,
) -> tripdata::Result<()> {
    for file in files {
        execute_sql_file(session, file)?;
    }
    if let Some(table) = table {
        let (schema, name) = table.split_once('.').unwrap_or((default_schema, table));
        let n = row_count(session, schema, name)?;
        info!("{}.{} has {} rows", schema, name, n);
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init("execute_sql", args.log_dir.as_deref())?;

    let env_file = format!(".env/{}.env", args.env);
    if let Err(e) = dotenvy::from_path(Path::new(&env_file)) {
        warn!("not loading {}: {}", env_file, e);
    }

    let res = match &args.duckdb {
        Some(path) => open_duckdb(path).and_then(|mut conn| {
            run(&mut conn, &args.files, args.row_count.as_deref(), "main")
        }),
        None => DbConfig::from_env()
            .and_then(|config| open_connection(&config))
            .and_then(|mut client| {
                run(&mut client, &args.files, args.row_count.as_deref(), "public")
            }),
    };
    if let Err(e) = res {
        error!("{}", report(&e));
        return Err(e.into());
    }
    Ok(())
}

use std::path::PathBuf;

use thiserror::Error;

use crate::period::PeriodError;

/// Underlying cause carried by every error kind.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    /// Network, timeout or filesystem failure while fetching an archive.  The
    /// destination file must not be used.
    #[error("failed to download citibike data from {url}")]
    Download {
        url: String,
        #[source]
        source: Cause,
    },

    /// Malformed or unreadable archive, or a failed write while extracting.
    /// The archive is left in place.
    #[error("failed to extract {}", path.display())]
    Extraction {
        path: PathBuf,
        #[source]
        source: Cause,
    },

    /// Missing credentials, unreachable or unresponsive database.
    #[error("database connection failed")]
    Connection(#[source] Cause),

    /// A statement of the script failed.  The transaction was rolled back.
    #[error("sql script execution failed")]
    ScriptExecution(#[source] Cause),

    /// Read-only query failed, outside of any transaction.
    #[error("query failed: {query}")]
    Query {
        query: String,
        #[source]
        source: Cause,
    },

    #[error(transparent)]
    Period(#[from] PeriodError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn download(url: &str, source: impl Into<Cause>) -> Error {
        Error::Download {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn extraction(path: impl Into<PathBuf>, source: impl Into<Cause>) -> Error {
        Error::Extraction {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn connection(source: impl Into<Cause>) -> Error {
        Error::Connection(source.into())
    }

    pub(crate) fn script(source: impl Into<Cause>) -> Error {
        Error::ScriptExecution(source.into())
    }

    pub(crate) fn query(query: &str, source: impl Into<Cause>) -> Error {
        Error::Query {
            query: query.to_string(),
            source: source.into(),
        }
    }
}

/// Render an error together with its chain of causes on one line.
pub fn report(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn report_includes_causes() {
        let err = Error::download(
            "https://example.com/a.zip",
            io::Error::new(io::ErrorKind::TimedOut, "timed out"),
        );
        assert_eq!(
            report(&err),
            "failed to download citibike data from https://example.com/a.zip: timed out"
        );
    }

    #[test]
    fn string_causes() {
        let err = Error::connection("missing database credentials");
        assert!(matches!(err, Error::Connection(_)));
        assert_eq!(report(&err), "database connection failed: missing database credentials");
    }
}

use std::fmt::Display;
use std::time::Instant;

use log::{debug, error, info};

/// Run `f`, logging when the operation starts, how long it took when it
/// succeeds, and the error when it fails.  The result is passed through
/// untouched.
pub fn logged<T, E, F>(operation: &str, f: F) -> Result<T, E>
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    debug!("calling {}", operation);
    let start = Instant::now();
    let res = f();
    match &res {
        Ok(_) => info!("{} completed in {:.2?}", operation, start.elapsed()),
        Err(e) => error!("{} failed after {:.2?}: {}", operation, start.elapsed(), e),
    }
    res
}

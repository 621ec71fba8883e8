use std::path::{Path, PathBuf};

use crate::download::{Fetcher, Transport};
use crate::error::Result;
use crate::period::Period;
use crate::unzip;
use crate::utils::instrument::logged;

/// Download the archive for `period` into `<root>/<year>[/<month>]/`, unzip it
/// there and remove the archive.  Returns the directory with the extracted
/// files.
///
/// On failure nothing should be assumed about the directory content, the
/// period needs to be ingested again.
pub fn ingest<T: Transport>(fetcher: &Fetcher<T>, period: &Period, root: &Path) -> Result<PathBuf> {
    logged(&format!("ingest {}", period), || {
        let archive = fetcher.fetch(period, root)?;
        let dir = root.join(period.relative_dir());
        unzip::extract(&archive, &dir)?;
        Ok(dir)
    })
}

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::Path;

use log::{info, warn};

use crate::error::{Cause, Error, Result};

/// Extract every entry of the zip archive into `destination`, keeping the
/// relative paths stored in the archive, then remove the archive.
///
/// Entries whose name would land outside of `destination` are skipped.  If the
/// archive can't be removed after a successful extraction a warning is logged
/// and the extraction still counts as done.
pub fn extract(archive: &Path, destination: &Path) -> Result<()> {
    info!("Unzipping file {}", archive.display());
    let count = extract_all(archive, destination).map_err(|e| Error::extraction(archive, e))?;
    info!(" -- extracted {} entries to {}", count, destination.display());

    match fs::remove_file(archive) {
        Ok(()) => info!("removed zip file {}", archive.display()),
        Err(e) => warn!("failed to remove zip file {}: {}", archive.display(), e),
    }
    Ok(())
}

fn extract_all(archive: &Path, destination: &Path) -> std::result::Result<usize, Cause> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))?;
    fs::create_dir_all(destination)?;

    let mut count = 0;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let relative = match entry.enclosed_name() {
            Some(path) => path,
            None => {
                warn!(" -- skipping entry with unsafe name {}", entry.name());
                continue;
            }
        };
        let out_path = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(dir) = out_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        info!(" -- extracted file to {}", out_path.display());
        count += 1;
    }
    Ok(count)
}

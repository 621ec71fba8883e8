use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use env_logger::{Target, WriteStyle};
use jiff::Zoned;
use log::warn;

/// Log file for a program, `<log_dir>/<name>/<name>-<mm-dd-YYYY>.log`.  One
/// file per day, appended to by every run of that day.
pub fn log_file_path(log_dir: &Path, name: &str, today: &Zoned) -> PathBuf {
    log_dir
        .join(name)
        .join(format!("{}-{}.log", name, today.strftime("%m-%d-%Y")))
}

/// Writes every log line to stderr and to a file.
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Install the logger for a binary.  Level is `Info` unless `RUST_LOG` says
/// otherwise.  With a `log_dir`, lines also go to the daily log file.
///
/// Returns `false` when a logger was already installed.  That logger stays in
/// charge and nothing is written to the log file.
pub fn init(name: &str, log_dir: Option<&Path>) -> io::Result<bool> {
    let mut builder = env_logger::builder();
    builder.filter_level(log::LevelFilter::Info).parse_default_env();

    if let Some(log_dir) = log_dir {
        let path = log_file_path(log_dir, name, &Zoned::now());
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        builder
            .write_style(WriteStyle::Never)
            .target(Target::Pipe(Box::new(Tee { file })));
    }

    match builder.try_init() {
        Ok(()) => Ok(true),
        Err(e) => {
            warn!("keeping the logger already installed, {} not used: {}", name, e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_file_name() {
        let today: Zoned = "2025-12-03T08:15:00+00:00[UTC]".parse().unwrap();
        assert_eq!(
            log_file_path(Path::new("logs"), "download_citibike_data", &today),
            Path::new("logs/download_citibike_data/download_citibike_data-12-03-2025.log")
        );
    }

    #[test]
    fn creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        init("logging_test", Some(dir.path())).unwrap();
        assert!(dir.path().join("logging_test").is_dir());
    }

    #[test]
    fn second_logger_is_not_installed() {
        let dir = tempfile::tempdir().unwrap();
        let _ = init("first", None).unwrap();
        assert!(!init("second", Some(dir.path())).unwrap());
    }
}

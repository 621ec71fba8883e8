use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use reqwest::blocking::Client;

use crate::error::{Cause, Error, Result};
use crate::period::Period;

pub const DEFAULT_BASE_URL: &str = "https://s3.amazonaws.com/tripdata";
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const CHUNK_SIZE: usize = 10 * 1024 * 1024;
pub const PROGRESS_INTERVAL: u64 = 10 * 1024 * 1024;

/// Response body of a remote file, not yet read.
pub struct RemoteFile {
    /// Declared `Content-Length`, if the server sent one.
    pub content_length: Option<u64>,
    pub body: Box<dyn Read + Send>,
}

/// How the bytes of a remote file are obtained.  A non-success status must be
/// reported as an error, never as a body.
pub trait Transport {
    fn get(&self, url: &str) -> std::result::Result<RemoteFile, Cause>;
}

/// Plain HTTP GET over a blocking `reqwest` client.  Only establishing the
/// connection is bounded in time, the body is streamed for as long as it takes.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    pub connect_timeout: Duration,
}

impl Default for HttpTransport {
    fn default() -> Self {
        HttpTransport {
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> std::result::Result<RemoteFile, Cause> {
        let client = Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(None::<Duration>)
            .build()?;
        let response = client.get(url).send()?.error_for_status()?;
        Ok(RemoteFile {
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }
}

/// What the fetcher reports while a download is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Response received.  `total_bytes` is 0 when the size was not declared.
    Started { total_bytes: u64 },
    /// Another progress interval was crossed.
    Downloaded { bytes: u64 },
    Complete { bytes: u64 },
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}

/// State of one fetch, discarded once the stream is closed.
#[derive(Debug)]
struct DownloadTask {
    url: String,
    path: PathBuf,
    total_size: u64,
    written: u64,
    next_report: u64,
    interval: u64,
}

impl DownloadTask {
    fn new(url: String, path: PathBuf, interval: u64) -> DownloadTask {
        DownloadTask {
            url,
            path,
            total_size: 0,
            written: 0,
            next_report: interval,
            interval,
        }
    }

    /// Account for `n` more bytes on disk.  Reports once for every interval
    /// crossed, so a large chunk may produce several reports.
    fn advance(&mut self, n: u64, observer: &mut dyn FnMut(Progress)) {
        self.written += n;
        while self.written >= self.next_report {
            info!("downloaded {:.2} megabytes", megabytes(self.written));
            observer(Progress::Downloaded {
                bytes: self.written,
            });
            self.next_report += self.interval;
        }
    }
}

/// Fill `buf` from `reader`, stopping early only at the end of the stream.
fn read_chunk(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Downloads trip data archives into `<root>/<year>[/<month>]/`.
pub struct Fetcher<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
    chunk_size: usize,
    progress_interval: u64,
}

impl Fetcher<HttpTransport> {
    pub fn new() -> Fetcher<HttpTransport> {
        Fetcher::with_transport(HttpTransport::default())
    }
}

impl Default for Fetcher<HttpTransport> {
    fn default() -> Self {
        Fetcher::new()
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn with_transport(transport: T) -> Fetcher<T> {
        Fetcher {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            chunk_size: CHUNK_SIZE,
            progress_interval: PROGRESS_INTERVAL,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_progress_interval(mut self, bytes: u64) -> Self {
        self.progress_interval = bytes.max(1);
        self
    }

    pub fn url(&self, period: &Period) -> String {
        period.url(&self.base_url)
    }

    /// Where the archive for this period lands.  Does not check if the file exists.
    pub fn destination(&self, period: &Period, root: &Path) -> PathBuf {
        root.join(period.relative_dir()).join(period.file_name())
    }

    pub fn fetch(&self, period: &Period, root: &Path) -> Result<PathBuf> {
        self.fetch_with_progress(period, root, |_| {})
    }

    /// Stream the archive for `period` to disk, one chunk at a time.  On error
    /// the partially written file is removed.
    pub fn fetch_with_progress<F>(
        &self,
        period: &Period,
        root: &Path,
        mut observer: F,
    ) -> Result<PathBuf>
    where
        F: FnMut(Progress),
    {
        let mut task = DownloadTask::new(
            self.url(period),
            self.destination(period, root),
            self.progress_interval,
        );
        info!("downloading {} to {}", task.url, task.path.display());

        match self.stream(&mut task, &mut observer) {
            Ok(()) => Ok(task.path),
            Err(e) => {
                match fs::remove_file(&task.path) {
                    Ok(()) => info!("removed incomplete file {}", task.path.display()),
                    Err(re) if re.kind() == io::ErrorKind::NotFound => {}
                    Err(re) => warn!(
                        "failed to remove incomplete file {}: {}",
                        task.path.display(),
                        re
                    ),
                }
                Err(Error::download(&task.url, e))
            }
        }
    }

    fn stream(
        &self,
        task: &mut DownloadTask,
        observer: &mut dyn FnMut(Progress),
    ) -> std::result::Result<(), Cause> {
        if let Some(dir) = task.path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut remote = self.transport.get(&task.url)?;
        task.total_size = remote.content_length.unwrap_or(0);
        info!("download size of {:.2} megabytes", megabytes(task.total_size));
        observer(Progress::Started {
            total_bytes: task.total_size,
        });

        let mut out = File::create(&task.path)?;
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let n = read_chunk(remote.body.as_mut(), &mut buf)?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])?;
            task.advance(n as u64, observer);
        }
        out.flush()?;

        if task.total_size > 0 && task.written != task.total_size {
            return Err(format!(
                "incomplete download, got {} of {} bytes",
                task.written, task.total_size
            )
            .into());
        }

        info!("download complete {}", task.url);
        observer(Progress::Complete {
            bytes: task.written,
        });
        Ok(())
    }
}

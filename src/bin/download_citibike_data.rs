use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};
use tripdata::download::{Fetcher, DEFAULT_BASE_URL};
use tripdata::error::report;
use tripdata::pipeline::ingest;
use tripdata::utils::logging;
use tripdata::Period;

/// Download and unzip one archive of Citi Bike trip data.
///
/// Older data is stored in yearly archives, e.g. `download_citibike_data 2018`,
/// recent data in monthly ones, e.g. `download_citibike_data 2025 12`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    year: u16,

    month: Option<u8>,

    /// Root directory for the downloaded data
    #[arg(short, long, default_value = "data/raw")]
    output_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Also write the log to a daily file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init("download_citibike_data", args.log_dir.as_deref())?;

    let period = match args.month {
        Some(month) => Period::monthly(args.year, month)?,
        None => Period::yearly(args.year),
    };

    let fetcher = Fetcher::new().with_base_url(&args.base_url);
    match ingest(&fetcher, &period, &args.output_dir) {
        Ok(dir) => {
            info!("data for {} is in {}", period, dir.display());
            Ok(())
        }
        Err(e) => {
            error!("{}", report(&e));
            Err(e.into())
        }
    }
}

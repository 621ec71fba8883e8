pub mod db;
pub mod download;
pub mod error;
pub mod period;
pub mod pipeline;
pub mod unzip;
pub mod utils;

pub use error::{Error, Result};
pub use period::Period;

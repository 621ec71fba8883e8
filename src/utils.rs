pub mod instrument;
pub mod logging;

pub mod config;
pub mod connection;
pub mod session;
pub mod sql;

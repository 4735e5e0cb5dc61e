pub mod cluster;
pub mod config;
pub mod context;
pub mod metrics;
pub mod window;

pub mod error;
pub mod time;

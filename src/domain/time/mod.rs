//! Time domain module

mod duration;

pub use duration::{
    Duration, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RETENTION_DAYS, DEFAULT_SWEEP_INTERVAL_SECS,
};

//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Memory Monitor: Samples memory usage and entry count, evicting when
//!   either is over its threshold

mod monitor;

pub use monitor::spawn_memory_monitor;

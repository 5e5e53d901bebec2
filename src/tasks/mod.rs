//! Background Tasks Module
//!
//! # Tasks
//! - Expiry sweep: reclaims expired cache entries at a configured interval

mod cleanup;

pub use cleanup::spawn_cleanup_task;

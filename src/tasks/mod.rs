//! Background Tasks Module
//!
//! Optional tasks that keep a long-lived cache tidy.
//!
//! # Tasks
//! - Purge: drops expired memory cache entries at a fixed interval

mod purge;

pub use purge::spawn_purge_task;

//! Bounded worker pool runtime.
//!
//! A fixed set of workers pull jobs from a [`JobQueue`] through a single
//! dispatcher, with a stop barrier that waits for every in-flight job.

pub mod pool;

pub use pool::JobQueue;

mod queue;
mod registry;
mod worker;

pub use queue::JobQueue;

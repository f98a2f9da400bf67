//! # Runtime Module
//!
//! Single-threaded plumbing shared by every manager: the cooperative coroutine
//! [`Scheduler`] and the construct-once holders ([`Lazy`], [`Persistent`]) that
//! replace process-wide singletons.

pub mod scheduler;
pub mod singleton;

// Re-export main types
pub use scheduler::{NextFrame, Scheduler, SchedulerHandle, WaitFor};
pub use singleton::{InstanceGuard, Lazy, Persistent};

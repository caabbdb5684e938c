//! Reference backends.
//!
//! Production storage engines plug in from outside the crate; these two
//! keep the contracts exercisable end to end. `MemoryGraph` is ephemeral
//! and costs nothing to set up; `LogGraph` adds an append-log with real
//! batch-commit durability so the boundary properties can be tested
//! against reopen.

pub mod log;
pub mod memory;

pub use self::log::LogGraph;
pub use memory::MemoryGraph;

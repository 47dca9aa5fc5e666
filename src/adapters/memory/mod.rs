//! In-memory database backend
//!
//! Selected with `database_target = "memory"`. Data lives only as long as the
//! process.

pub mod adapter;

pub use adapter::MemoryAdapter;

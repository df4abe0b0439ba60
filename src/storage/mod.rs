//! In-Memory Storage Module
//!
//! Owns every record the service keeps for the lifetime of the process.
//!
//! ## Core Concepts
//! - **Collections**: accounts, contact requests and newsletter subscriptions live in
//!   three independent arenas, each with its own id counter starting at 1.
//! - **Access**: lookups by id are index reads; lookups by username or email are linear scans.
//! - **Mutation**: records are never removed. Status flags change through read-modify-write
//!   under the collection's write lock.
//! - **Interface**: handlers only see the `Storage` trait, so tests can swap in their own backend.

pub mod memory;
pub mod store;
pub mod types;

pub use memory::MemStorage;
pub use store::Storage;

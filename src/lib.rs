//! Contact Intake Service Library
//!
//! A small HTTP backend that accepts contact-form and newsletter-subscription
//! submissions, validates them and keeps them in memory for the lifetime of
//! the process. The binary (`main.rs`) wires these modules together.
//!
//! ## Modules
//! - **`storage`**: the in-memory store. Three independent collections with
//!   per-collection id counters, exposed through the `Storage` trait.
//! - **`api`**: request handlers. Body extraction, schema validation and the
//!   mapping of outcomes to JSON envelopes.
//! - **`server`**: router assembly, request logging and front-end asset serving.
//! - **`config`**: command-line and environment configuration.

pub mod api;
pub mod config;
pub mod server;
pub mod storage;

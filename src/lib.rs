//! Lead ingestion and qualification API library.
//!
//! A small business lead-management backend: public lead submission with
//! automated qualification via an external scoring service, persistence,
//! best-effort webhook forwarding, and read-only display queries.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `db`: Database connection and schema bootstrap.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Core data models.
//! - `notifier`: Follow-up automation webhook dispatcher.
//! - `pipeline`: The lead ingestion pipeline.
//! - `qualifier`: Scoring service client.
//! - `store`: Persistence abstraction (Postgres / in-memory).

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notifier;
pub mod pipeline;
pub mod qualifier;
pub mod store;

//! Data-access layer for the shortstay rental listings application.
//!
//! Provides storage backends implementing the repository traits from
//! `shortstay_core::storage`. Each repository method issues at most one
//! round trip to the database; there is no shared mutable state between
//! calls beyond what the database itself provides.

pub mod config;
pub mod storage;

pub use config::Config;

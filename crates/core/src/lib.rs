//! Core domain types and logic for the shortstay project.
//!
//! This crate is free of I/O and database driver dependencies: it defines
//! the rental domain types, the property search query builder, and the
//! repository traits that storage backends implement.

pub mod rental;
pub mod search;
pub mod storage;

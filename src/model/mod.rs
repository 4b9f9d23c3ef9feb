//! Persistent data: accounts, drawn pairs, and the MongoDB plumbing for them.

pub mod common;
pub mod db;
pub mod mongodb;

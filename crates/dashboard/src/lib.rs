//! Acme Dashboard library.
//!
//! This crate provides the invoicing dashboard as a library, allowing the
//! router to be driven in-process by tests and the repositories to be reused
//! by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stores;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

//! Ecoleta API library.
//!
//! This crate provides the API functionality as a library, allowing the
//! router to be tested in-process and the repositories to be reused by the
//! CLI and integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

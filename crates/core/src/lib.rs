//! Ecoleta Core - Shared types library.
//!
//! This crate provides the types shared by every Ecoleta component:
//! - `api` - REST backend over the points/items store
//! - `web` - Create-point form state and HTTP clients
//! - `cli` - Migrations, catalog seeding and point registration
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. The `postgres` feature adds `sqlx` encoding for
//! the ID newtypes.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, the item-id list parser, and the point/item
//!   wire types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

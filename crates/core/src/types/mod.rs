//! Core types for Ecoleta.
//!
//! This module provides type-safe wrappers and the JSON shapes exchanged
//! between the API and its clients.

pub mod id;
pub mod item;
pub mod item_ids;
pub mod point;

pub use id::*;
pub use item::Item;
pub use item_ids::{ItemIdList, ItemIdListError};
pub use point::{Coordinates, NewPoint, Point, PointDetail, PointError, PointSearch};

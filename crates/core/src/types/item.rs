//! Recyclable-material categories.

use serde::{Deserialize, Serialize};

use super::ItemId;

/// A category of recyclable material a collection point may accept.
///
/// Items are static reference data; the API only ever reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item ID.
    pub id: ItemId,
    /// Display title (e.g. "Lâmpadas").
    pub title: String,
    /// Absolute URL of the category icon.
    pub image_url: String,
}

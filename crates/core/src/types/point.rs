//! Collection points and the payloads that create and query them.
//!
//! Field names on the wire are the Portuguese ones the web client sends
//! (`nome`, `cidade`, `estado`, ...). Rust-side names are English.

use serde::{Deserialize, Deserializer, Serialize};

use super::{ItemId, ItemIdList, PointId};

/// Validation failures for a [`NewPoint`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PointError {
    /// A required text field is empty or whitespace.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// Latitude outside [-90, 90] or not finite.
    #[error("latitude must be between -90 and 90 (got {0})")]
    InvalidLatitude(f64),
    /// Longitude outside [-180, 180] or not finite.
    #[error("longitude must be between -180 and 180 (got {0})")]
    InvalidLongitude(f64),
    /// The point accepts no item categories.
    #[error("at least one item must be selected")]
    NoItems,
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check both components are finite and within range.
    ///
    /// # Errors
    ///
    /// Returns [`PointError::InvalidLatitude`] or
    /// [`PointError::InvalidLongitude`].
    pub fn validate(&self) -> Result<(), PointError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(PointError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(PointError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }
}

/// Request body of `POST /points`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPoint {
    /// Entity name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone (WhatsApp).
    pub whatsapp: String,
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// Street number. Accepted as a JSON string or number.
    #[serde(rename = "numero", deserialize_with = "string_or_number")]
    pub street_number: String,
    /// City name, as listed by the geography service.
    #[serde(rename = "cidade")]
    pub city: String,
    /// Two-letter state code (UF).
    #[serde(rename = "estado")]
    pub state: String,
    /// Accepted item categories.
    pub items: Vec<ItemId>,
}

impl NewPoint {
    /// Validate the payload before it reaches the store.
    ///
    /// # Errors
    ///
    /// Returns the first [`PointError`] found: blank name, email, city or
    /// state; out-of-range coordinates; or an empty item list.
    pub fn validate(&self) -> Result<(), PointError> {
        let required = [
            ("nome", &self.name),
            ("email", &self.email),
            ("cidade", &self.city),
            ("estado", &self.state),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PointError::MissingField(field));
            }
        }

        self.coordinates().validate()?;

        if self.items.is_empty() {
            return Err(PointError::NoItems);
        }

        Ok(())
    }

    /// The point's location.
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// The distinct item ids, in submission order.
    #[must_use]
    pub fn item_ids(&self) -> ItemIdList {
        ItemIdList::from(self.items.clone())
    }
}

/// A stored collection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Point ID.
    pub id: PointId,
    /// Image URL shown for the point.
    pub image: String,
    /// Entity name.
    #[serde(rename = "nome")]
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone (WhatsApp).
    pub whatsapp: String,
    /// Degrees north.
    pub latitude: f64,
    /// Degrees east.
    pub longitude: f64,
    /// Street number.
    #[serde(rename = "numero")]
    pub street_number: String,
    /// City name.
    #[serde(rename = "cidade")]
    pub city: String,
    /// Two-letter state code (UF).
    #[serde(rename = "estado")]
    pub state: String,
}

/// Response of `GET /points/{id}`: the point and the titles of its items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointDetail {
    /// The point itself.
    pub point: Point,
    /// Titles of the accepted item categories.
    pub items: Vec<String>,
}

/// Filters of `GET /points`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointSearch {
    /// Exact city match.
    pub city: String,
    /// Exact state match.
    pub state: String,
    /// Points must accept at least one of these items.
    pub items: ItemIdList,
}

impl PointSearch {
    /// Query-string pairs in the shape the API expects.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("cidade", self.city.clone()),
            ("estado", self.state.clone()),
            ("items", self.items.to_string()),
        ]
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Integer(n) => n.to_string(),
    })
}

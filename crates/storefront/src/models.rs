use serde::{Deserialize, Serialize};

fn default_available() -> bool {
    true
}

/// A product as written to the `products` collection.
///
/// `createdAt` and `updatedAt` are not part of the record; the store stamps
/// both with its own clock when the document is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Pre-discount price. Absent values are written as an explicit null.
    #[serde(default)]
    pub original_price: Option<f64>,
    pub image_url: String,
    pub category: String,
    pub rating: f64,
    pub reviews: u32,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

/// Server-assigned timestamp field names.
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

//! Product dataset loading.

use std::path::Path;

use storefront::ProductRecord;
use thiserror::Error;

/// The sample catalogue shipped with the crate.
const BUNDLED_PRODUCTS: &str = include_str!("../data/products.json");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Dataset parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An ordered list of products to seed.
///
/// Loading checks JSON shape only; field values are taken as written.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub products: Vec<ProductRecord>,
}

impl Dataset {
    /// The sample catalogue compiled into the binary.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json(BUNDLED_PRODUCTS)
    }

    /// Loads a JSON array of products from a file.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let products = serde_json::from_reader(reader)?;
        Ok(Self { products })
    }

    /// Parses a JSON array of products.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let products = serde_json::from_str(json)?;
        Ok(Self { products })
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

//! Entity generators for seed data.
//!
//! - [`ProductGenerator`]: random catalogue entries, independent of the bundled dataset

pub mod product;

pub use product::{ProductGenConfig, ProductGenerator};

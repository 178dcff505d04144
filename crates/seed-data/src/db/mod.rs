//! Document store integration for seeding the catalogue.
//!
//! The [`Seeder`] writes products one at a time and stops at the first
//! failure, reporting what was already written.

mod seeder;

pub use seeder::{DEFAULT_COLLECTION, SeedError, SeedReport, Seeder, exit_status};

//! `ioplan-core`: planning foundation building blocks.
//!
//! This crate contains **pure** primitives shared by the planning engine and
//! its outer layers: item identifiers, the item catalog, and the error
//! taxonomy. No IO, no configuration.

pub mod catalog;
pub mod error;
pub mod id;

pub use catalog::Catalog;
pub use error::{PlanError, PlanResult};
pub use id::ItemId;

//! Static and runtime name resolution.
//!
//! This module provides:
//! - `Shape`, the declared form of an identifier (scalar type, SQL column,
//!   bound parameter or nested object)
//! - `Schema`, the immutable name → shape mapping an optimizer validates against
//! - `Scope`, the name → value mapping an interpreter evaluates against

mod scope;
mod shape;

pub use scope::Scope;
pub use shape::{Schema, Shape};

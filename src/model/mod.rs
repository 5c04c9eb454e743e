//! Molecular records stored in canonical sets.
//!
//! - [`atom`] – Element symbol and Cartesian coordinates.
//! - [`types`] – Bond orders and typed property values.
//! - [`molecule`] – A connection table with a name and ordered properties.
//! - [`properties`] – Copying metadata from one record to another.
//!
//! These types are the concrete record behind [`crate::PropertyKey`]; the
//! [`crate::CanonicalSet`] container itself works with any record type.

pub mod atom;
pub mod molecule;
pub mod properties;
pub mod types;

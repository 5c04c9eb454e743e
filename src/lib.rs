//! Deduplicated, insertion-ordered collections of molecules keyed by canonical identity.
//!
//! Screening pipelines merge compound libraries from many vendors. The same
//! structure shows up many times, as separate records with separate
//! coordinates and annotations. `molset` stores such records in a
//! [`CanonicalSet`]: membership is decided by a canonical key derived from
//! each record, not by the record object, while insertion order is kept so
//! the collection can still be walked and indexed like a list.
//!
//! # Features
//!
//! - **Canonical-key container**: O(1) keyed lookup, positional access,
//!   `pop`, batch removal by index with all-or-nothing validation
//! - **Set algebra**: union, in-place union, intersection and difference as
//!   named methods and as `+`, `+=`, `&`, `-` on references
//! - **Seal tracking**: an advisory dirty flag broken by every successful
//!   structural mutation
//! - **Pluggable canonicalization**: any [`Canonicalizer`]; a property-backed
//!   [`PropertyKey`] ships for SDF libraries that already carry SMILES or
//!   InChIKey data items
//! - **SDF I/O**: multi-record V2000 read/write including data items
//!
//! # Quick Start
//!
//! ```
//! use molset::{CanonicalSet, Molecule, PropertyKey, SetConfig};
//!
//! let key = PropertyKey::new("SMILES").with_achiral("SMILES_FLAT");
//!
//! let l_ala = Molecule::named("L-alanine")
//!     .with_property("SMILES", "C[C@@H](C(=O)O)N")
//!     .with_property("SMILES_FLAT", "CC(C(=O)O)N");
//! let d_ala = Molecule::named("D-alanine")
//!     .with_property("SMILES", "C[C@H](C(=O)O)N")
//!     .with_property("SMILES_FLAT", "CC(C(=O)O)N");
//! let vendor_copy = Molecule::named("alanine, vendor B")
//!     .with_property("SMILES", "C[C@@H](C(=O)O)N")
//!     .with_property("SMILES_FLAT", "CC(C(=O)O)N");
//!
//! let mut library = CanonicalSet::new(key.clone());
//! assert!(library.add(l_ala.clone())?);
//! assert!(library.add(d_ala.clone())?);
//! assert!(!library.add(vendor_copy)?); // same canonical key as L-alanine
//! assert_eq!(library.len(), 2);
//! assert!(!library.is_sealed());
//!
//! // Ignoring stereochemistry collapses both enantiomers.
//! let config = SetConfig { preserve_chirality: false, ..Default::default() };
//! let flat = CanonicalSet::from_records(key, config, [l_ala, d_ala])?;
//! assert_eq!(flat.keys(), vec!["CC(C(=O)O)N"]);
//!
//! // Positional and keyed access.
//! assert_eq!(library[0].name.as_deref(), Some("L-alanine"));
//! assert_eq!(library.pop_front()?.name.as_deref(), Some("L-alanine"));
//! assert!(library.get("C[C@H](C(=O)O)N").is_some());
//! # Ok::<(), molset::SetError<molset::KeyError>>(())
//! ```
//!
//! # Module Organization
//!
//! - [`set`]: The [`CanonicalSet`] container and its operators
//! - [`canon`]: The [`Canonicalizer`] trait and shipped implementations
//! - [`model`]: Molecule records and [`copy_properties`]
//! - [`io`]: SDF reading and writing
//! - [`datadir`]: Data file lookup in an injected directory
//!
//! # Concurrency
//!
//! All operations are synchronous and take `&self` or `&mut self`. Records
//! are held in [`std::sync::Arc`], so a set whose records and canonicalizer
//! are `Send + Sync` can be shared across threads behind a lock owned by the
//! caller.

pub mod canon;
pub mod datadir;
pub mod io;
pub mod model;
pub mod set;

pub use canon::{Canonicalizer, FromFn, KeyError, PropertyKey, from_fn};
pub use datadir::{DataDir, DataFileError};
pub use model::atom::Atom;
pub use model::molecule::{Bond, Molecule};
pub use model::properties::{CopyOptions, TEMPORARY_MARKER, copy_properties};
pub use model::types::{BondOrder, ParseBondOrderError, PropertyValue};
pub use set::{CanonicalSet, IntoIter, Iter, Locator, SetConfig};

pub use set::Error as SetError;

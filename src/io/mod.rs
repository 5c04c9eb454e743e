//! File I/O for molecule records.
//!
//! Only the SDF format is supported: it is the interchange format of
//! screening libraries and the only common one that carries arbitrary
//! per-record data items, which is where canonical keys live.
//!
//! ```
//! use std::io::Cursor;
//! use molset::io::sdf;
//! use molset::Molecule;
//!
//! let water = Molecule::named("water").with_property("SMILES", "O");
//! let mut buf = Vec::new();
//! sdf::write(&mut buf, &water)?;
//!
//! let parsed = sdf::read(Cursor::new(buf))?;
//! assert_eq!(parsed.name.as_deref(), Some("water"));
//! # Ok::<(), molset::io::Error>(())
//! ```

pub mod error;
pub mod sdf;
pub mod util;

pub use error::Error;

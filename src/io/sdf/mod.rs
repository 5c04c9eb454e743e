//! MDL SDF (V2000) records with data items.

pub mod reader;
pub mod writer;

pub use reader::{read, read_all};
pub use writer::{write, write_all};

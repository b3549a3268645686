//! Voice database codec (C2): on-disk layout, build-time writer, mmap read
//! path.

pub mod build;
pub mod header;
pub mod index;
pub mod reader;

pub use build::build_database;
pub use reader::{Database, UnitMatch};

pub mod asset;
pub mod audo;
pub mod dump;
pub mod error;
pub mod index;
pub mod io;
pub mod parser;
pub mod patch;
pub mod plan;
pub mod png;
pub mod section;
pub mod sprt;
pub mod txtr;
pub mod writer;

pub use error::{Error, Result};
pub use index::Index;
pub use patch::{Patch, PatchSet, PatchSource};
pub use plan::PlannedIndex;

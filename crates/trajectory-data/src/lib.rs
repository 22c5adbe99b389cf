//! # Trajectory Data
//!
//! Ingestion of precomputed N-body output: parsing the line-oriented text dump,
//! computing normalization scalars over the full dataset, and emitting the
//! two vertex layouts the renderer consumes.

pub mod error;
pub mod layout;
pub mod normalize;
pub mod parser;

pub use error::*;
pub use layout::*;
pub use normalize::*;
pub use parser::*;

//! Safe SQL builder: identifiers from field descriptors only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;

//! Loaders for world geometry, country names, facts and trip data.

use std::path::Path;

pub mod error;
pub mod facts;
pub mod geojson;
pub mod names;
pub mod timeline;
pub mod topojson;
pub mod trips;
pub mod world;

pub use error::*;
pub use facts::*;
pub use names::*;
pub use timeline::*;
pub use trips::*;
pub use world::*;

pub(crate) fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

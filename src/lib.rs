//! zpolyline core
//!
//! Polyline / z-polyline codec and spherical geometry over lat/lng(/ele) paths.

pub mod coord;
pub mod elevation;
pub mod error;
pub mod geometry;
pub mod polyline;
pub mod traits;

pub use coord::{LatLng, LatLngEle};
pub use error::{DecodeError, ElevationError, ParseError};
pub use polyline::{Polyline, ZPolyline};

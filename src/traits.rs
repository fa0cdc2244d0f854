//! Seams for external collaborators.
//!
//! The codec and geometry modules never call these; they only exchange the
//! coordinate records that implementations consume and produce.

use crate::coord::{LatLng, LatLngEle};
use crate::error::ElevationError;

/// Looks up elevations for a path.
///
/// Implementations return one [`LatLngEle`] per input point, in input order.
pub trait ElevationProvider {
    fn elevation_for(&self, points: &[LatLng]) -> Result<Vec<LatLngEle>, ElevationError>;
}

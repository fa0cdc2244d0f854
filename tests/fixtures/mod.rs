//! Test fixtures for zpolyline.
//!
//! A real-world path in Palo Alto / Menlo Park, CA, encoded in both the 2D
//! and the z-polyline format.

#![allow(dead_code)]

use zpolyline::{LatLng, LatLngEle};

pub const EPS: f64 = 0.0001;

/// 21 points: south from Sand Hill Road, then east-south-east.
pub const PATH_POLYLINE: &str =
    "kbhcF`_ciV|Bt@nBDrA_@dG?|[_Ax[}@v[_Az[_AnCqQnCoQlCqQnCqQnCqQnCqQpCoQlCqQlCqQpCoQlCqQnCqQ";

pub const PATH_LEN: usize = 21;

/// Circular mean of the leg bearings along [`PATH_POLYLINE`].
pub const PATH_AVERAGE_BEARING: f64 = 134.43;

/// The first four points of the path with elevations attached.
pub const PATH_ZPOLYLINE: &str = "kbhcF`_ciV_|kdR|Bt@onqCnBD~}cHrA_@n_euR";

pub fn path_start() -> LatLng {
    LatLng::new(37.4021463, -122.2451293)
}

pub fn path_end() -> LatLng {
    LatLng::new(37.3721483, -122.2083962)
}

pub fn path_head_with_elevation() -> Vec<LatLngEle> {
    vec![
        LatLngEle::new(37.40214, -122.24513, 100.5),
        LatLngEle::new(37.40151, -122.2454, 101.25),
        LatLngEle::new(37.40095, -122.24543, 99.75),
        LatLngEle::new(37.40053, -122.24527, -3.5),
    ]
}

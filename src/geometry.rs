//! Spherical geometry over coordinate paths.
//!
//! The Earth is modelled as a sphere of radius [`EARTH_RADIUS_M`]. Inputs are
//! never range checked: out-of-range latitudes/longitudes give well-defined but
//! geodetically meaningless results, and degenerate inputs may yield NaN.
//! See: http://www.movable-type.co.uk/scripts/latlong.html

use crate::coord::{LatLng, LatLngEle, lat_lngs};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Haversine (great-circle) distance between two points in metres.
pub fn distance(from: LatLng, to: LatLng) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Initial compass bearing from `from` to `to` in degrees, in `[0, 360)`.
///
/// Not symmetric. For `from == to` the result is whatever the formula yields.
pub fn bearing(from: LatLng, to: LatLng) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let y = delta_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lng.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Circular mean of the bearings between consecutive points, in `[0, 360)`.
///
/// Paths with fewer than two points have no legs and yield `0`.
/// See: https://en.wikipedia.org/wiki/Mean_of_circular_quantities
pub fn average_bearing(points: &[LatLng]) -> f64 {
    if points.len() <= 1 {
        return 0.0;
    }

    let (sin_sum, cos_sum) = points
        .windows(2)
        .map(|leg| bearing(leg[0], leg[1]).to_radians())
        .fold((0.0_f64, 0.0_f64), |(s, c), angle| (s + angle.sin(), c + angle.cos()));

    normalize_bearing(sin_sum.atan2(cos_sum).to_degrees())
}

/// [`average_bearing`] over the 2D projection of a 3D path.
pub fn average_bearing_z(points: &[LatLngEle]) -> f64 {
    average_bearing(&lat_lngs(points))
}

/// Spherical centroid of the points, also known as the geographic midpoint.
///
/// Points are averaged as unit vectors, so paths crossing the antimeridian or
/// passing near a pole are handled correctly. An empty slice yields the zero
/// coordinate; a single point is returned unchanged.
pub fn average(points: &[LatLng]) -> LatLng {
    match points {
        [] => LatLng::default(),
        [only] => *only,
        _ => {
            let [x, y, z] = mean_unit_vector(points.iter().copied());
            vector_to_lat_lng(x, y, z)
        }
    }
}

/// [`average`] for 3D points; elevation is the arithmetic mean of the inputs.
pub fn average_z(points: &[LatLngEle]) -> LatLngEle {
    match points {
        [] => LatLngEle::default(),
        [only] => *only,
        _ => {
            let [x, y, z] = mean_unit_vector(points.iter().map(LatLngEle::lat_lng));
            let ele = points.iter().map(|p| p.ele).sum::<f64>() / points.len() as f64;
            vector_to_lat_lng(x, y, z).with_elevation(ele)
        }
    }
}

fn mean_unit_vector(points: impl ExactSizeIterator<Item = LatLng>) -> [f64; 3] {
    let n = points.len() as f64;
    let [x, y, z] = points.fold([0.0; 3], |[x, y, z], p| {
        let lat = p.lat.to_radians();
        let lng = p.lng.to_radians();
        [
            x + lat.cos() * lng.cos(),
            y + lat.cos() * lng.sin(),
            z + lat.sin(),
        ]
    });
    [x / n, y / n, z / n]
}

fn vector_to_lat_lng(x: f64, y: f64, z: f64) -> LatLng {
    let lng = y.atan2(x);
    let lat = z.atan2((x * x + y * y).sqrt());
    LatLng::new(lat.to_degrees(), lng.to_degrees())
}

/// Shifts a bearing by the smallest non-negative multiple of 360 into `[0, 360)`.
fn normalize_bearing(b: f64) -> f64 {
    b + (-b / 360.0).ceil() * 360.0
}

//! Coordinate records and their `"lat,lng"` / `"lat,lng,ele"` text form.
//!
//! Multiple records are joined with `|`, e.g. `"12.34,56.78|14.89,123.89"`.
//! No range validation happens here or anywhere else in the crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A point on the sphere in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// A point on the sphere in decimal degrees with an elevation in metres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLngEle {
    pub lat: f64,
    pub lng: f64,
    pub ele: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Lifts this point to 3D with the given elevation.
    pub fn with_elevation(self, ele: f64) -> LatLngEle {
        LatLngEle::new(self.lat, self.lng, ele)
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn almost_equal(&self, other: &LatLng, eps: f64) -> bool {
        (self.lat - other.lat).abs() <= eps && (self.lng - other.lng).abs() <= eps
    }
}

impl LatLngEle {
    pub fn new(lat: f64, lng: f64, ele: f64) -> Self {
        Self { lat, lng, ele }
    }

    /// The 2D projection of this point.
    pub fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    /// Component-wise comparison with an absolute tolerance.
    pub fn almost_equal(&self, other: &LatLngEle, eps: f64) -> bool {
        self.lat_lng().almost_equal(&other.lat_lng(), eps) && (self.ele - other.ele).abs() <= eps
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl From<(f64, f64, f64)> for LatLngEle {
    fn from((lat, lng, ele): (f64, f64, f64)) -> Self {
        Self::new(lat, lng, ele)
    }
}

/// Projects every point of a 3D sequence onto 2D.
pub fn lat_lngs(points: &[LatLngEle]) -> Vec<LatLng> {
    points.iter().map(LatLngEle::lat_lng).collect()
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl fmt::Display for LatLngEle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.lat, self.lng, self.ele)
    }
}

impl FromStr for LatLng {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [lat, lng] = parse_fields::<2>(s)?;
        Ok(Self::new(lat, lng))
    }
}

impl FromStr for LatLngEle {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [lat, lng, ele] = parse_fields::<3>(s)?;
        Ok(Self::new(lat, lng, ele))
    }
}

/// Parses `|`-separated `"lat,lng"` pairs. An empty string yields no points.
pub fn parse_lat_lngs(s: &str) -> Result<Vec<LatLng>, ParseError> {
    parse_list(s)
}

/// Parses `|`-separated `"lat,lng,ele"` triples. An empty string yields no points.
pub fn parse_lat_lng_eles(s: &str) -> Result<Vec<LatLngEle>, ParseError> {
    parse_list(s)
}

pub fn format_lat_lngs(points: &[LatLng]) -> String {
    format_list(points)
}

pub fn format_lat_lng_eles(points: &[LatLngEle]) -> String {
    format_list(points)
}

fn parse_list<T: FromStr<Err = ParseError>>(s: &str) -> Result<Vec<T>, ParseError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    s.split('|').map(str::parse).collect()
}

fn format_list<T: fmt::Display>(points: &[T]) -> String {
    points
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

fn parse_fields<const N: usize>(s: &str) -> Result<[f64; N], ParseError> {
    let fields: Vec<&str> = s.split(',').collect();
    if fields.len() != N {
        return Err(ParseError::FieldCount {
            expected: N,
            found: fields.len(),
            input: s.to_string(),
        });
    }

    let mut values = [0.0; N];
    for (field, (slot, text)) in values.iter_mut().zip(&fields).enumerate() {
        *slot = text.parse().map_err(|source| ParseError::InvalidNumber {
            field,
            input: s.to_string(),
            source,
        })?;
    }
    Ok(values)
}

//! Polyline codec for route geometries.
//!
//! Implements the Google polyline algorithm for `lat,lng` paths and its
//! z-polyline extension, which appends an elevation delta to every point.
//! See: https://developers.google.com/maps/documentation/utilities/polylinealgorithm
//!
//! Each dimension is quantized to 5 decimal digits (truncating toward zero),
//! delta coded against the previous point, zig-zag mapped to unsigned and
//! written as little-endian 5-bit chunks offset into printable ASCII (63..=126).
//! Points and dimensions are not separated; varint framing alone delimits them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::{LatLng, LatLngEle};
use crate::error::DecodeError;

/// Quantization factor: coordinates keep 5 decimal digits.
pub const PRECISION: f64 = 1e5;

/// Inverse of [`PRECISION`]. Decoding multiplies by this rather than dividing by
/// `PRECISION` so a decoded value truncates back to the same integer on re-encode.
const SCALE: f64 = 1e-5;

const OFFSET: u8 = 63;
const CONTINUATION: u64 = 0x20;
const CHUNK_MASK: u64 = 0x1f;
const CHUNK_BITS: u32 = 5;

/// An encoded 2D polyline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polyline {
    points: String,
}

/// An encoded 3D (lat, lng, elevation) z-polyline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZPolyline {
    points: String,
}

impl Polyline {
    /// Encodes the given points.
    pub fn encode(points: &[LatLng]) -> Self {
        Self {
            points: encode_polyline(points),
        }
    }

    /// Decodes back into points. The string is not validated until this is called.
    pub fn decode(&self) -> Result<Vec<LatLng>, DecodeError> {
        decode_polyline(&self.points)
    }

    pub fn as_str(&self) -> &str {
        &self.points
    }

    pub fn into_string(self) -> String {
        self.points
    }
}

impl ZPolyline {
    /// Encodes the given points, elevation included.
    pub fn encode(points: &[LatLngEle]) -> Self {
        Self {
            points: encode_zpolyline(points),
        }
    }

    /// Decodes back into points. The string is not validated until this is called.
    pub fn decode(&self) -> Result<Vec<LatLngEle>, DecodeError> {
        decode_zpolyline(&self.points)
    }

    pub fn as_str(&self) -> &str {
        &self.points
    }

    pub fn into_string(self) -> String {
        self.points
    }
}

macro_rules! encoded_string_impls {
    ($ty:ty) => {
        impl From<String> for $ty {
            fn from(points: String) -> Self {
                Self { points }
            }
        }

        impl From<&str> for $ty {
            fn from(points: &str) -> Self {
                Self {
                    points: points.to_string(),
                }
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.points
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.points)
            }
        }
    };
}

encoded_string_impls!(Polyline);
encoded_string_impls!(ZPolyline);

/// Encodes `lat,lng` points. An empty slice encodes to an empty string.
pub fn encode_polyline(points: &[LatLng]) -> String {
    encode_groups(points.iter().map(|p| [p.lat, p.lng]))
}

/// Encodes `lat,lng,ele` points. An empty slice encodes to an empty string.
pub fn encode_zpolyline(points: &[LatLngEle]) -> String {
    encode_groups(points.iter().map(|p| [p.lat, p.lng, p.ele]))
}

/// Decodes a polyline string. An empty string decodes to no points.
pub fn decode_polyline(s: &str) -> Result<Vec<LatLng>, DecodeError> {
    let groups = decode_groups::<2>(s)?;
    Ok(groups.into_iter().map(|[lat, lng]| LatLng { lat, lng }).collect())
}

/// Decodes a z-polyline string. An empty string decodes to no points.
pub fn decode_zpolyline(s: &str) -> Result<Vec<LatLngEle>, DecodeError> {
    let groups = decode_groups::<3>(s)?;
    Ok(groups
        .into_iter()
        .map(|[lat, lng, ele]| LatLngEle { lat, lng, ele })
        .collect())
}

fn encode_groups<const N: usize>(groups: impl ExactSizeIterator<Item = [f64; N]>) -> String {
    let mut out = String::with_capacity(groups.len() * N * 4);
    let mut previous = [0i64; N];

    for group in groups {
        for (value, prev) in group.into_iter().zip(previous.iter_mut()) {
            // `as` truncates toward zero (and saturates on out-of-range input).
            let quantized = (value * PRECISION) as i64;
            encode_int(quantized.wrapping_sub(*prev), &mut out);
            *prev = quantized;
        }
    }

    out
}

fn encode_int(value: i64, out: &mut String) {
    let mut v = ((value << 1) ^ (value >> 63)) as u64;
    while v >= CONTINUATION {
        out.push(char::from((CONTINUATION | (v & CHUNK_MASK)) as u8 + OFFSET));
        v >>= CHUNK_BITS;
    }
    out.push(char::from(v as u8 + OFFSET));
}

fn decode_groups<const N: usize>(s: &str) -> Result<Vec<[f64; N]>, DecodeError> {
    let mut reader = VarintReader::new(s.as_bytes());
    let mut totals = [0i64; N];
    let mut groups = Vec::with_capacity(s.len() / (N * 2));

    while !reader.is_at_end() {
        for (found, total) in totals.iter_mut().enumerate() {
            if reader.is_at_end() {
                let err = DecodeError::IncompleteGroup { expected: N, found };
                tracing::trace!(%err, offset = reader.pos, "rejecting polyline");
                return Err(err);
            }
            let delta = reader
                .read()
                .inspect_err(|err| tracing::trace!(%err, offset = reader.pos, "rejecting polyline"))?;
            *total = total.wrapping_add(delta);
        }
        groups.push(totals.map(|v| v as f64 * SCALE));
    }

    Ok(groups)
}

/// Reads zig-zag varints from an encoded byte stream.
struct VarintReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> VarintReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn read(&mut self) -> Result<i64, DecodeError> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift: u32 = 0;

        loop {
            let Some(&raw) = self.bytes.get(self.pos) else {
                return Err(DecodeError::MalformedVarint { offset: start });
            };
            if !(OFFSET..=126).contains(&raw) {
                return Err(DecodeError::InvalidByte {
                    offset: self.pos,
                    byte: raw,
                });
            }
            let chunk = u64::from(raw - OFFSET);
            let payload = chunk & CHUNK_MASK;
            // Past bit 59 only the low `64 - shift` payload bits still fit.
            let overflows = shift >= u64::BITS
                || (shift > u64::BITS - CHUNK_BITS && payload >> (u64::BITS - shift) != 0);
            if overflows {
                return Err(DecodeError::Overflow { offset: start });
            }
            self.pos += 1;

            result |= payload << shift;
            shift += CHUNK_BITS;

            if chunk < CONTINUATION {
                return Ok(((result >> 1) as i64) ^ -((result & 1) as i64));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 0.0001;

    fn google_points() -> Vec<LatLng> {
        vec![
            LatLng::new(38.5, -120.2),
            LatLng::new(40.7, -120.95),
            LatLng::new(43.252, -126.453),
        ]
    }

    #[test]
    fn test_encode_reference_example() {
        assert_eq!(encode_polyline(&google_points()), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }

    #[test]
    fn test_decode_reference_example() {
        let decoded = decode_polyline("_p~iF~ps|U_ulLnnqC_mqNvxq`@").unwrap();
        assert_eq!(decoded.len(), 3);
        for (actual, want) in decoded.iter().zip(google_points()) {
            assert!(actual.almost_equal(&want, EPS), "got {:?}, want {:?}", actual, want);
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(encode_polyline(&[]), "");
        assert_eq!(encode_zpolyline(&[]), "");
        assert!(decode_polyline("").unwrap().is_empty());
        assert!(decode_zpolyline("").unwrap().is_empty());
    }

    #[test]
    fn test_single_unit_deltas() {
        assert_eq!(encode_polyline(&[LatLng::new(0.00001, 0.0)]), "A?");
        assert_eq!(encode_polyline(&[LatLng::new(-0.00001, 0.0)]), "@?");
    }

    #[test]
    fn test_truncates_toward_zero() {
        // 1.999999e-5 quantizes to 1, -1.999999e-5 to -1.
        assert_eq!(encode_polyline(&[LatLng::new(0.00001999999, -0.00001999999)]), "A@");
    }

    #[test]
    fn test_encode_zpolyline_appends_elevation() {
        let points = vec![
            LatLngEle::new(37.40214, -122.24513, 100.5),
            LatLngEle::new(37.40151, -122.2454, 101.25),
        ];
        assert_eq!(encode_zpolyline(&points), "kbhcF`_ciV_|kdR|Bt@onqC");
    }

    #[test]
    fn test_decode_zpolyline() {
        let decoded = decode_zpolyline("kbhcF`_ciV_|kdR|Bt@onqC").unwrap();
        assert_eq!(decoded.len(), 2);
        assert!(decoded[0].almost_equal(&LatLngEle::new(37.40214, -122.24513, 100.5), EPS));
        assert!(decoded[1].almost_equal(&LatLngEle::new(37.40151, -122.2454, 101.25), EPS));
    }

    #[test]
    fn test_malformed_varint() {
        let err = decode_polyline("_p~iF~ps|U_").unwrap_err();
        assert_eq!(err, DecodeError::MalformedVarint { offset: 10 });

        // Truncation inside a later dimension is an error too.
        let err = decode_polyline("_p~iF~ps").unwrap_err();
        assert_eq!(err, DecodeError::MalformedVarint { offset: 5 });
    }

    #[test]
    fn test_incomplete_group() {
        let err = decode_polyline("_p~iF").unwrap_err();
        assert_eq!(err, DecodeError::IncompleteGroup { expected: 2, found: 1 });

        let err = decode_zpolyline("_p~iF~ps|U").unwrap_err();
        assert_eq!(err, DecodeError::IncompleteGroup { expected: 3, found: 2 });

        // Five integers are one full 3D point plus two values of the next.
        let err = decode_zpolyline("_p~iF~ps|U_ulLnnqC_mqN").unwrap_err();
        assert_eq!(err, DecodeError::IncompleteGroup { expected: 3, found: 2 });
    }

    #[test]
    fn test_invalid_byte() {
        let err = decode_polyline("_p~iF ps|U").unwrap_err();
        assert_eq!(err, DecodeError::InvalidByte { offset: 5, byte: b' ' });

        let err = decode_polyline("??\u{7f}?").unwrap_err();
        assert_eq!(err, DecodeError::InvalidByte { offset: 2, byte: 0x7f });
    }

    #[test]
    fn test_overflow() {
        let err = decode_polyline(&"_".repeat(20)).unwrap_err();
        assert_eq!(err, DecodeError::Overflow { offset: 0 });

        // Thirteenth chunk with its top payload bit set: 65 bits.
        let err = decode_polyline("~~~~~~~~~~~~^?").unwrap_err();
        assert_eq!(err, DecodeError::Overflow { offset: 0 });

        let err = decode_polyline("??~~~~~~~~~~~~O?").unwrap_err();
        assert_eq!(err, DecodeError::Overflow { offset: 2 });
    }

    #[test]
    fn test_widest_varint_fits() {
        let mut encoded = String::new();
        encode_int(i64::MIN, &mut encoded);
        assert_eq!(encoded, "~~~~~~~~~~~~N");

        let mut reader = VarintReader::new(encoded.as_bytes());
        assert_eq!(reader.read(), Ok(i64::MIN));
        assert!(reader.is_at_end());
    }

    #[test]
    fn test_polyline_value_type() {
        let polyline = Polyline::encode(&google_points());
        assert_eq!(polyline.as_str(), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
        assert_eq!(polyline.to_string(), polyline.as_str());
        assert_eq!(polyline.decode().unwrap().len(), 3);
        assert_eq!(Polyline::from(polyline.clone().into_string()), polyline);
    }

    #[test]
    fn test_zpolyline_value_type() {
        let zpolyline = ZPolyline::from("kbhcF`_ciV_|kdR|Bt@onqC");
        let points = zpolyline.decode().unwrap();
        assert_eq!(ZPolyline::encode(&points), zpolyline);
    }

    #[test]
    fn test_serde_points_field() {
        let polyline = Polyline::from("_p~iF~ps|U");
        let json = serde_json::to_string(&polyline).unwrap();
        assert_eq!(json, r#"{"points":"_p~iF~ps|U"}"#);
        let back: ZPolyline = serde_json::from_str(r#"{"points":"???"}"#).unwrap();
        assert_eq!(back.decode().unwrap(), vec![LatLngEle::default()]);
    }
}

//! STL decoding and encoding for binary and ASCII formats.
//!
//! Binary layout:
//!
//! ```text
//! UINT8[80]    header (ignored)
//! UINT32       triangle count
//! foreach triangle
//!     REAL32[3] normal (ignored)
//!     REAL32[9] three vertices
//!     UINT16    attribute byte count (ignored)
//! ```
use std::fmt::Write as _;

use nom::{
    bytes::complete::take,
    combinator::all_consuming,
    multi::count,
    number::complete::{double, le_f32, le_u16, le_u32},
    sequence::tuple,
    IResult,
};
use tracing::{debug, warn};

use crate::error::{FormatError, StlResult};
use crate::geometry::{Mesh, Point, Triangle};

/// Binary header size in bytes
pub const HEADER_SIZE: usize = 80;

/// One binary triangle record: normal, three vertices, attribute count
pub const RECORD_SIZE: usize = 50;

const COUNT_SIZE: usize = 4;

/// Whether `data` is decoded as ASCII.
///
/// Anything shorter than a binary header, or starting with `solid`, is ASCII.
pub fn is_ascii_stl(data: &[u8]) -> bool {
    data.len() < HEADER_SIZE || data.starts_with(b"solid")
}

/// Detect the format and parse an STL buffer
pub fn parse_stl(data: &[u8]) -> StlResult<Mesh> {
    let mesh = if is_ascii_stl(data) {
        let text = String::from_utf8_lossy(data);
        parse_ascii_stl(&text)?
    } else {
        parse_binary_stl(data)?
    };

    debug!(
        bytes = data.len(),
        triangles = mesh.len(),
        ascii = is_ascii_stl(data),
        "Decoded STL"
    );
    Ok(mesh)
}

/// Parse a binary STL buffer
pub fn parse_binary_stl(data: &[u8]) -> StlResult<Mesh> {
    if data.len() < HEADER_SIZE + COUNT_SIZE {
        return Err(FormatError::MissingTriangleCount {
            available: data.len(),
        });
    }

    let (input, declared) = le_u32::<_, nom::error::Error<&[u8]>>(&data[HEADER_SIZE..])
        .map_err(|_| FormatError::MissingTriangleCount {
            available: data.len(),
        })?;

    // Validate the declared count against the buffer before touching any record
    let required = (HEADER_SIZE + COUNT_SIZE) as u64 + u64::from(declared) * RECORD_SIZE as u64;
    if required > data.len() as u64 {
        return Err(FormatError::Truncated {
            declared,
            required,
            available: data.len(),
        });
    }

    let truncated = FormatError::Truncated {
        declared,
        required,
        available: data.len(),
    };
    let (_, triangles) = count(facet, declared as usize)(input).map_err(|_| truncated)?;

    Ok(Mesh { triangles })
}

fn facet(input: &[u8]) -> IResult<&[u8], Triangle> {
    let (input, _normal) = take(12usize)(input)?;
    let (input, v0) = binary_point(input)?;
    let (input, v1) = binary_point(input)?;
    let (input, v2) = binary_point(input)?;
    let (input, _attribute_count) = le_u16(input)?;
    Ok((input, Triangle::new(v0, v1, v2)))
}

fn binary_point(input: &[u8]) -> IResult<&[u8], Point> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, Point::new(f64::from(x), f64::from(y), f64::from(z))))
}

/// Parse ASCII STL text.
///
/// Only `vertex` lines matter; every three consecutive vertices form a
/// triangle. `facet`, `outer loop` and `endsolid` lines are not checked.
pub fn parse_ascii_stl(input: &str) -> StlResult<Mesh> {
    let mut vertices = Vec::new();

    for (index, line) in input.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("vertex") {
            continue;
        }

        let mut coords = [0.0; 3];
        let mut found = 0;
        for token in tokens.take(3) {
            match parse_number(token) {
                Some(value) => {
                    coords[found] = value;
                    found += 1;
                }
                None => break,
            }
        }

        if found < 3 {
            return Err(FormatError::IncompleteVertex {
                line: index + 1,
                found,
            });
        }
        vertices.push(Point::new(coords[0], coords[1], coords[2]));
    }

    if vertices.len() % 3 != 0 {
        warn!(
            vertices = vertices.len(),
            "ASCII STL vertex count is not a multiple of 3, dropping the trailing vertices"
        );
    }

    let mut mesh = Mesh::with_capacity(vertices.len() / 3);
    for chunk in vertices.chunks_exact(3) {
        mesh.add_triangle(Triangle::new(chunk[0], chunk[1], chunk[2]));
    }
    Ok(mesh)
}

fn parse_number(token: &str) -> Option<f64> {
    all_consuming(double::<&str, nom::error::Error<&str>>)(token)
        .ok()
        .map(|(_, value)| value)
}

/// Encode a mesh as binary STL with zero normals and attributes.
///
/// Coordinates are narrowed to `f32`.
pub fn write_binary_stl(mesh: &Mesh) -> Vec<u8> {
    let mut data = Vec::with_capacity(HEADER_SIZE + COUNT_SIZE + mesh.len() * RECORD_SIZE);

    let mut header = [0u8; HEADER_SIZE];
    let label = b"binary STL written by stipple";
    header[..label.len()].copy_from_slice(label);
    data.extend_from_slice(&header);

    data.extend_from_slice(&(mesh.len() as u32).to_le_bytes());
    for triangle in &mesh.triangles {
        data.extend_from_slice(&[0u8; 12]);
        for vertex in &triangle.vertices {
            for &c in vertex.iter() {
                data.extend_from_slice(&(c as f32).to_le_bytes());
            }
        }
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

/// Encode a mesh as ASCII STL with zero normals
pub fn write_ascii_stl(mesh: &Mesh, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {name}");
    for triangle in &mesh.triangles {
        out.push_str("  facet normal 0 0 0\n    outer loop\n");
        for v in &triangle.vertices {
            let _ = writeln!(out, "      vertex {} {} {}", v.x, v.y, v.z);
        }
        out.push_str("    endloop\n  endfacet\n");
    }
    let _ = writeln!(out, "endsolid {name}");
    out
}

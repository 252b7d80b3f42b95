/// STL model loader for binary and multi-solid ASCII files
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{many0, many1},
    number::complete::float,
    sequence::preceded,
    IResult,
};
use std::path::Path;
use tracing::{debug, info};

use crate::error::ModelError;
use crate::geometry::{Mesh, Model, Part, Triangle, Vertex};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// Parse a binary STL file into a single `body` part
pub fn parse_binary_stl(data: &[u8]) -> Result<Model, ModelError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(ModelError::TooSmall { len: data.len() });
    }

    // Skip 80-byte header
    let data = &data[HEADER_LEN..];

    // Read triangle count (4 bytes, little-endian)
    let triangle_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

    let mut mesh = Mesh::with_capacity(triangle_count.min(data.len() / FACET_LEN));
    let mut offset = 4;

    for index in 0..triangle_count {
        if offset + FACET_LEN > data.len() {
            return Err(ModelError::Truncated {
                index,
                count: triangle_count,
            });
        }

        let [nx, ny, nz] = read_vec3(data, offset);
        offset += 12;

        let mut vertices = [Vertex::new(0.0, 0.0, 0.0, nx, ny, nz); 3];
        for vertex in &mut vertices {
            let [x, y, z] = read_vec3(data, offset);
            *vertex = Vertex::new(x, y, z, nx, ny, nz);
            offset += 12;
        }

        // Skip attribute byte count (2 bytes)
        offset += 2;

        mesh.add_triangle(Triangle::new(vertices[0], vertices[1], vertices[2]));
    }

    Ok(Model::new(vec![Part::new("body", mesh)]))
}

fn read_vec3(data: &[u8], offset: usize) -> [f32; 3] {
    let f = |at: usize| f32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
    [f(offset), f(offset + 4), f(offset + 8)]
}

/// Parse an ASCII STL file; every `solid <name>` block becomes a part
pub fn parse_ascii_stl(input: &str) -> Result<Model, ModelError> {
    match parse_ascii_stl_impl(input) {
        Ok(("", parts)) => Ok(Model::new(parts)),
        Ok((rest, _)) => Err(ModelError::Ascii {
            context: snippet(rest),
        }),
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => Err(ModelError::Ascii {
            context: snippet(e.input),
        }),
        Err(nom::Err::Incomplete(_)) => Err(ModelError::Ascii {
            context: "unexpected end of input".to_string(),
        }),
    }
}

fn snippet(input: &str) -> String {
    input.trim_start().chars().take(40).collect()
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Vec<Part>> {
    let (input, solids) = many1(parse_solid)(input)?;
    let (input, _) = multispace0(input)?;

    let parts = solids
        .into_iter()
        .enumerate()
        .map(|(i, (name, mesh))| {
            let name = if name.is_empty() {
                format!("part{i}")
            } else {
                name
            };
            Part::new(name, mesh)
        })
        .collect();

    Ok((input, parts))
}

fn parse_solid(input: &str) -> IResult<&str, (String, Mesh)> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, name) = not_line_ending(input)?;
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    let (input, _) = not_line_ending(input)?;

    let mut mesh = Mesh::with_capacity(triangles.len());
    for triangle in triangles {
        mesh.add_triangle(triangle);
    }

    Ok((input, (name.trim().to_string(), mesh)))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input, normal)?;
    let (input, v2) = parse_vertex(input, normal)?;
    let (input, v3) = parse_vertex(input, normal)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, Triangle::new(v1, v2, v3)))
}

fn parse_vertex(input: &str, normal: (f32, f32, f32)) -> IResult<&str, Vertex> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Vertex::new(x, y, z, normal.0, normal.1, normal.2)))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Model, ModelError> {
    // Binary files may also start with "solid", so fall back on failure
    if data.len() > 5 && &data[0..5] == b"solid" {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(model) => return Ok(model),
                Err(e) => debug!(error = %e, "not ASCII STL, trying binary"),
            }
        }
    }

    parse_binary_stl(data)
}

/// Read and parse a model file from disk
pub fn load_model(path: &Path) -> Result<Model, ModelError> {
    let data = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let model = parse_stl(&data)?;
    info!(
        path = %path.display(),
        parts = model.parts.len(),
        buttons = model.buttons().count(),
        triangles = model.triangle_count(),
        "loaded model"
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::Button;
    use crate::geometry::PartKind;

    const TWO_SOLIDS: &str = "solid body
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 1 1 0
    endloop
  endfacet
endsolid body
solid btn_eq
  facet normal 0 0 1
    outer loop
      vertex 0 0 1
      vertex 1 0 1
      vertex 1 1 1
    endloop
  endfacet
  facet normal 0 0 1
    outer loop
      vertex 0 0 1
      vertex 1 1 1
      vertex 0 1 1
    endloop
  endfacet
endsolid btn_eq
";

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        // Set triangle count to 0
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let model = parse_binary_stl(&data).unwrap();
        assert_eq!(model.parts.len(), 1);
        assert_eq!(model.parts[0].name, "body");
        assert_eq!(model.triangle_count(), 0);
    }

    #[test]
    fn test_binary_triangle() {
        let mut data = vec![0u8; 80];
        data.extend_from_slice(&1u32.to_le_bytes());
        for value in [0.0f32, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
            data.extend_from_slice(&value.to_le_bytes());
        }
        data.extend_from_slice(&[0, 0]);

        let model = parse_binary_stl(&data).unwrap();
        let triangle = &model.parts[0].mesh.triangles[0];
        assert_eq!(triangle.vertices[1].position.x, 1.0);
        assert_eq!(triangle.vertices[2].normal.z, 1.0);
    }

    #[test]
    fn test_binary_errors() {
        assert!(matches!(
            parse_binary_stl(&[0u8; 10]),
            Err(ModelError::TooSmall { len: 10 })
        ));

        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[0u8; 50]);
        assert!(matches!(
            parse_binary_stl(&data),
            Err(ModelError::Truncated { index: 1, count: 2 })
        ));
    }

    #[test]
    fn test_ascii_solids_become_named_parts() {
        let model = parse_stl(TWO_SOLIDS.as_bytes()).unwrap();
        assert_eq!(model.parts.len(), 2);
        assert_eq!(model.parts[0].kind, PartKind::Body);
        assert_eq!(model.parts[1].name, "btn_eq");
        assert_eq!(model.parts[1].kind, PartKind::Button(Button::Equals));
        assert_eq!(model.parts[1].mesh.triangles.len(), 2);
    }

    #[test]
    fn test_ascii_unnamed_solid() {
        let model = parse_ascii_stl("solid\nendsolid\n").unwrap();
        assert_eq!(model.parts[0].name, "part0");
    }

    #[test]
    fn test_ascii_trailing_garbage_is_an_error() {
        let err = parse_ascii_stl("solid a\nendsolid a\nfacet").unwrap_err();
        assert!(matches!(err, ModelError::Ascii { ref context } if context == "facet"));
    }
}

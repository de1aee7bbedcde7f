/// STL parser for the ASCII encoding
use tracing::{debug, warn};

use crate::error::{MeshError, MeshResult};
use crate::geometry::{Face, MeshData, Vertex};
use crate::lex::{keyword, position};

/// Size of a binary STL header plus its triangle count.
const BINARY_PREAMBLE: usize = 84;
/// Size of one binary STL facet record.
const BINARY_FACET: usize = 50;

/// True if `data` has exactly the length a binary STL with its declared facet count would have.
pub fn looks_like_binary_stl(data: &[u8]) -> bool {
    if data.len() < BINARY_PREAMBLE {
        return false;
    }
    let count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    count
        .checked_mul(BINARY_FACET)
        .and_then(|n| n.checked_add(BINARY_PREAMBLE))
        == Some(data.len())
}

/// Check that `data` is an ASCII STL and return it as text.
pub fn ascii_stl_text(data: &[u8]) -> MeshResult<&str> {
    let unsupported = |why: &str| {
        let hint = if looks_like_binary_stl(data) {
            " (file size matches the binary STL layout)"
        } else {
            ""
        };
        MeshError::UnsupportedEncoding(format!("{why}{hint}; only ASCII STL is supported"))
    };

    if data.contains(&0) {
        return Err(unsupported("STL data contains NUL bytes"));
    }
    let text = std::str::from_utf8(data).map_err(|_| unsupported("STL data is not valid text"))?;
    if text.split_whitespace().next() != Some("solid") {
        return Err(unsupported("STL data does not start with `solid`"));
    }
    Ok(text)
}

/// Parse an ASCII STL file into raw vertices and faces.
///
/// Every `vertex x y z` line is collected; each run of three becomes one
/// triangle over three new vertices, so shared corners are not welded. A
/// trailing facet with fewer than three vertices is dropped.
pub fn parse_ascii_stl(data: &[u8]) -> MeshResult<MeshData> {
    let text = ascii_stl_text(data)?;
    let mut mesh = MeshData::default();
    let mut facet: Vec<Vertex> = Vec::with_capacity(3);
    let mut skipped = 0usize;

    for (idx, line) in text.lines().enumerate() {
        let Ok((fields, _)) = keyword("vertex")(line.trim_start()) else {
            continue;
        };
        if fields.split_whitespace().count() < 3 {
            skipped += 1;
            continue;
        }

        facet.push(position(idx + 1, line, fields)?);
        if facet.len() == 3 {
            let start = mesh.vertices.len();
            mesh.vertices.append(&mut facet);
            mesh.faces.push(Face::new(vec![start, start + 1, start + 2]));
        }
    }

    if !facet.is_empty() {
        warn!(
            vertices = facet.len(),
            "dropping incomplete trailing STL facet"
        );
    }
    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        skipped,
        "parsed ASCII STL"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    const ONE_FACET: &str = "solid tri
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid tri
";

    #[test]
    fn test_single_facet() {
        let mesh = parse_ascii_stl(ONE_FACET.as_bytes()).unwrap();
        assert_eq!(
            mesh.vertices,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ]
        );
        assert_eq!(mesh.faces, vec![Face::new(vec![0, 1, 2])]);
    }

    #[test]
    fn test_partial_trailing_facet_dropped() {
        let input = format!("{ONE_FACET}solid more\nfacet normal 0 0 1\nouter loop\nvertex 5 5 5\nvertex 6 5 5\n");
        let mesh = parse_ascii_stl(input.as_bytes()).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.faces.len(), 1);
    }

    #[test]
    fn test_second_facet_indices_continue() {
        let input = ONE_FACET.replace("endsolid tri", "facet normal 0 0 1\nouter loop\nvertex 1 1 1\nvertex 2 1 1\nvertex 1 2 1\nendloop\nendfacet\nendsolid tri");
        let mesh = parse_ascii_stl(input.as_bytes()).unwrap();
        assert_eq!(mesh.faces, vec![Face::new(vec![0, 1, 2]), Face::new(vec![3, 4, 5])]);
        assert_eq!(mesh.vertices[4], Point3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn test_malformed_vertex() {
        let input = ONE_FACET.replace("vertex 1 0 0", "vertex 1 zero 0");
        match parse_ascii_stl(input.as_bytes()).unwrap_err() {
            MeshError::Parse { line, .. } => assert_eq!(line, 5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_short_vertex_line_skipped() {
        let input = ONE_FACET.replace("vertex 1 0 0", "vertex 1 0\n      vertex 1 0 0");
        let mesh = parse_ascii_stl(input.as_bytes()).unwrap();
        assert_eq!(mesh.vertices.len(), 3);
    }

    #[test]
    fn test_binary_rejected() {
        let mut data = vec![0u8; 84 + 50];
        data[80..84].copy_from_slice(&1u32.to_le_bytes());
        match parse_ascii_stl(&data).unwrap_err() {
            MeshError::UnsupportedEncoding(msg) => assert!(msg.contains("binary STL layout")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_binary_with_solid_header_rejected() {
        let mut data = vec![b' '; 84];
        data[..5].copy_from_slice(b"solid");
        data[80..84].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            parse_ascii_stl(&data).unwrap_err(),
            MeshError::UnsupportedEncoding(_)
        ));
    }

    #[test]
    fn test_missing_solid_rejected() {
        let input = ONE_FACET.replace("solid tri\n", "");
        assert!(matches!(
            parse_ascii_stl(input.as_bytes()).unwrap_err(),
            MeshError::UnsupportedEncoding(_)
        ));
    }

    #[test]
    fn test_looks_like_binary() {
        let mut data = vec![0u8; 84 + 100];
        data[80..84].copy_from_slice(&2u32.to_le_bytes());
        assert!(looks_like_binary_stl(&data));
        data.push(0);
        assert!(!looks_like_binary_stl(&data));
        assert!(!looks_like_binary_stl(b"solid"));
    }
}

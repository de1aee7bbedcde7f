/// Wavefront OBJ parser (positions and faces only)
use tracing::debug;

use crate::error::{MeshError, MeshResult};
use crate::geometry::{Face, MeshData};
use crate::lex::{index_token, keyword, position};

/// Parse OBJ text into raw vertices and faces.
///
/// Only `v` and `f` records are read; every other record (normals, texture
/// coordinates, groups, materials, comments) is skipped. Face references keep
/// only their position index, so `3`, `3/1`, `3/1/2` and `3//2` all name the
/// third vertex.
pub fn parse_obj(input: &str) -> MeshResult<MeshData> {
    let mut data = MeshData::default();
    let mut skipped = 0usize;

    for (line_no, line) in logical_lines(input) {
        let record = line.trim_start();

        if let Ok((fields, _)) = keyword("v")(record) {
            data.vertices.push(position(line_no, &line, fields)?);
        } else if let Ok((fields, _)) = keyword("f")(record) {
            let face = parse_face(line_no, &line, fields, &data)?;
            data.faces.push(face);
        } else if !record.is_empty() && !record.starts_with('#') {
            skipped += 1;
        }
    }

    debug!(
        vertices = data.vertices.len(),
        faces = data.faces.len(),
        skipped,
        "parsed OBJ"
    );
    Ok(data)
}

fn parse_face(line_no: usize, line: &str, fields: &str, data: &MeshData) -> MeshResult<Face> {
    let declared = data.vertices.len();
    fields
        .split_whitespace()
        .map(|token| {
            let head = token.split('/').next().unwrap_or(token);
            let raw = index_token(head)
                .ok_or_else(|| MeshError::parse(line_no, line, format!("invalid vertex reference {token:?}")))?;
            resolve_index(raw, declared).ok_or(MeshError::IndexOutOfRange {
                face: data.faces.len(),
                index: raw,
                vertex_count: declared,
            })
        })
        .collect::<MeshResult<Vec<_>>>()
        .map(Face::new)
}

/// 1-based absolute references, or negative references counted back from the
/// last vertex declared so far. Zero is never valid.
fn resolve_index(raw: i64, declared: usize) -> Option<usize> {
    match raw {
        0 => None,
        n if n > 0 => usize::try_from(n - 1).ok(),
        n => {
            let back = usize::try_from(n.unsigned_abs()).ok()?;
            declared.checked_sub(back)
        }
    }
}

/// Physical lines joined on trailing backslashes, tagged with the 1-based
/// number of their first physical line.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in input.lines().enumerate() {
        let (start, mut buf) = pending.take().unwrap_or_else(|| (idx + 1, String::new()));
        match raw.strip_suffix('\\') {
            Some(head) => {
                buf.push_str(head);
                buf.push(' ');
                pending = Some((start, buf));
            }
            None => {
                buf.push_str(raw);
                lines.push((start, buf));
            }
        }
    }
    if let Some(last) = pending {
        lines.push(last);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_single_triangle() {
        let data = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(
            data.vertices,
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ]
        );
        assert_eq!(data.faces, vec![Face::new(vec![0, 1, 2])]);
    }

    #[test]
    fn test_slash_references() {
        let input = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
                     vt 0 0\nvn 0 0 1\n\
                     f 1/1 2/1/1 3//1 4\n";
        let data = parse_obj(input).unwrap();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.faces, vec![Face::new(vec![0, 1, 2, 3])]);
    }

    #[test]
    fn test_homogeneous_w_ignored() {
        let data = parse_obj("v 1 2 3 1.0\n").unwrap();
        assert_eq!(data.vertices, vec![Point3::new(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn test_unknown_records_ignored() {
        let input = "# comment\nmtllib a.mtl\no cube\ng side\nusemtl red\ns off\n\nv 0 0 0\n";
        let data = parse_obj(input).unwrap();
        assert_eq!(data.vertices.len(), 1);
        assert!(data.faces.is_empty());
    }

    #[test]
    fn test_malformed_coordinate_reports_line() {
        let err = parse_obj("v 0 0 0\nv 1 abc 0\n").unwrap_err();
        match err {
            MeshError::Parse { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "v 1 abc 0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_coordinate_is_an_error() {
        assert!(matches!(
            parse_obj("v 1 2\n").unwrap_err(),
            MeshError::Parse { line: 1, .. }
        ));
    }

    #[test]
    fn test_malformed_face_reference() {
        let err = parse_obj("v 0 0 0\nf 1 x 1\n").unwrap_err();
        assert!(matches!(err, MeshError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_negative_references() {
        let data = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(data.faces, vec![Face::new(vec![0, 1, 2])]);
    }

    #[test]
    fn test_zero_reference_out_of_range() {
        let err = parse_obj("v 0 0 0\nf 0 1 1\n").unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: 0, .. }));

        let err = parse_obj("v 0 0 0\nf -2 1 1\n").unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: -2, .. }));
    }

    #[test]
    fn test_line_continuation() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 \\\n2 3\nv 1 2 x\n").unwrap_err();
        // the broken vertex sits on physical line 6
        assert!(matches!(err, MeshError::Parse { line: 6, .. }));

        let data = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 \\\n2 3\n").unwrap();
        assert_eq!(data.faces, vec![Face::new(vec![0, 1, 2])]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let data = parse_obj("v 0 0 0\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3\r\n").unwrap();
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.faces.len(), 1);
    }
}

/// Stanford PLY parser, ASCII encoding only
///
/// The header declares how many vertex and face records follow `end_header`.
/// Parsing is a small state machine:
///
/// ```text
/// ReadingHeader --end_header--> ReadingVertices --N read--> ReadingFaces --M read--> Done
/// ```
///
/// with the vertex or face state skipped when its count is zero.
use tracing::{debug, warn};

use crate::error::{MeshError, MeshResult};
use crate::geometry::{Face, MeshData};
use crate::lex::{count_token, index_token, position};

/// Encoding named on the header's `format` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlyEncoding {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

/// Counts and encoding collected from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlyHeader {
    pub encoding: PlyEncoding,
    pub vertex_count: usize,
    pub face_count: usize,
}

impl Default for PlyHeader {
    fn default() -> Self {
        Self {
            encoding: PlyEncoding::Ascii,
            vertex_count: 0,
            face_count: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadingHeader,
    ReadingVertices { remaining: usize },
    ReadingFaces { remaining: usize },
    Done,
}

struct PlyReader {
    state: State,
    header: PlyHeader,
    data: MeshData,
    skipped: usize,
}

impl PlyReader {
    fn new() -> Self {
        Self {
            state: State::ReadingHeader,
            header: PlyHeader::default(),
            data: MeshData::default(),
            skipped: 0,
        }
    }

    fn header_line(&mut self, line_no: usize, line: &str) -> MeshResult<()> {
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("end_header") => self.state = self.after_header(),
            Some("format") => {
                self.header.encoding = match fields.next() {
                    Some("ascii") => PlyEncoding::Ascii,
                    Some("binary_little_endian") => PlyEncoding::BinaryLittleEndian,
                    Some("binary_big_endian") => PlyEncoding::BinaryBigEndian,
                    _ => return Err(MeshError::parse(line_no, line, "unknown PLY format")),
                };
            }
            Some("element") => {
                let name = fields.next();
                let count = fields
                    .next()
                    .and_then(count_token)
                    .and_then(|n| usize::try_from(n).ok())
                    .ok_or_else(|| MeshError::parse(line_no, line, "invalid element count"))?;
                match name {
                    Some("vertex") => self.header.vertex_count = count,
                    Some("face") => self.header.face_count = count,
                    other => debug!(element = ?other, count, "ignoring PLY element"),
                }
            }
            // comment, obj_info, property and anything unknown
            _ => {}
        }
        Ok(())
    }

    fn after_header(&self) -> State {
        if self.header.vertex_count > 0 {
            State::ReadingVertices {
                remaining: self.header.vertex_count,
            }
        } else {
            self.after_vertices()
        }
    }

    fn after_vertices(&self) -> State {
        if self.header.face_count > 0 {
            State::ReadingFaces {
                remaining: self.header.face_count,
            }
        } else {
            State::Done
        }
    }

    fn body_line(&mut self, line_no: usize, line: &str) -> MeshResult<()> {
        match self.state {
            State::ReadingVertices { remaining } => {
                if line.split_whitespace().count() < 3 {
                    self.skip(line_no, "vertex");
                    return Ok(());
                }
                self.data.vertices.push(position(line_no, line, line.trim_start())?);
                self.state = if remaining > 1 {
                    State::ReadingVertices {
                        remaining: remaining - 1,
                    }
                } else {
                    self.after_vertices()
                };
            }
            State::ReadingFaces { remaining } => {
                let Some(face) = self.face_record(line_no, line)? else {
                    self.skip(line_no, "face");
                    return Ok(());
                };
                self.data.faces.push(face);
                self.state = if remaining > 1 {
                    State::ReadingFaces {
                        remaining: remaining - 1,
                    }
                } else {
                    State::Done
                };
            }
            State::ReadingHeader | State::Done => {}
        }
        Ok(())
    }

    /// `k i0 i1 ... ik-1`, trailing per-face properties ignored. `None` if the
    /// record is too short to hold its declared indices.
    fn face_record(&self, line_no: usize, line: &str) -> MeshResult<Option<Face>> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Ok(None);
        }
        let k = count_token(fields[0])
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| MeshError::parse(line_no, line, "invalid face vertex count"))?;
        if fields.len() - 1 < k {
            return Ok(None);
        }

        let mut indices = Vec::with_capacity(k);
        for token in &fields[1..=k] {
            let raw = index_token(token)
                .ok_or_else(|| MeshError::parse(line_no, line, format!("invalid vertex index {token:?}")))?;
            let index = usize::try_from(raw).map_err(|_| MeshError::IndexOutOfRange {
                face: self.data.faces.len(),
                index: raw,
                vertex_count: self.header.vertex_count,
            })?;
            indices.push(index);
        }
        Ok(Some(Face::new(indices)))
    }

    fn skip(&mut self, line_no: usize, record: &str) {
        self.skipped += 1;
        debug!(line = line_no, record, "skipping short PLY record");
    }

    fn finish(self) -> MeshResult<MeshData> {
        match self.state {
            State::ReadingVertices { remaining } => warn!(
                expected = self.header.vertex_count,
                missing = remaining,
                "PLY data ended before all vertices were read"
            ),
            State::ReadingFaces { remaining } => warn!(
                expected = self.header.face_count,
                missing = remaining,
                "PLY data ended before all faces were read"
            ),
            State::ReadingHeader | State::Done => {}
        }
        debug!(
            vertices = self.data.vertices.len(),
            faces = self.data.faces.len(),
            skipped = self.skipped,
            "parsed PLY"
        );
        Ok(self.data)
    }
}

/// Parse the header of a PLY file, returning it with the byte offset of the body.
pub fn parse_ply_header(input: &[u8]) -> MeshResult<(PlyHeader, usize)> {
    let mut reader = PlyReader::new();
    let mut offset = 0;
    let mut last_line = 0;

    for (idx, raw) in input.split_inclusive(|&b| b == b'\n').enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        offset += raw.len();
        let line = std::str::from_utf8(raw)
            .map_err(|_| MeshError::parse(line_no, "", "PLY header is not ASCII text"))?;

        if idx == 0 {
            if line.trim() != "ply" {
                return Err(MeshError::parse(line_no, line, "missing ply magic"));
            }
            continue;
        }

        reader.header_line(line_no, line)?;
        if reader.state != State::ReadingHeader {
            return Ok((reader.header, offset));
        }
    }

    Err(MeshError::parse(last_line, "", "PLY header has no end_header line"))
}

/// Parse an ASCII PLY file into raw vertices and faces.
///
/// Binary-encoded files are rejected with [`MeshError::UnsupportedEncoding`].
/// Records too short to hold three coordinates, or a face's declared indices,
/// are skipped and do not count toward the header totals.
pub fn parse_ply(input: &[u8]) -> MeshResult<MeshData> {
    let (header, body_offset) = parse_ply_header(input)?;
    if header.encoding != PlyEncoding::Ascii {
        return Err(MeshError::UnsupportedEncoding(format!(
            "PLY {:?} is not supported, only ascii",
            header.encoding
        )));
    }

    let body = std::str::from_utf8(&input[body_offset..]).map_err(|_| {
        MeshError::UnsupportedEncoding("PLY body is not valid text".to_string())
    })?;
    let header_lines = input[..body_offset].iter().filter(|&&b| b == b'\n').count();

    // header counts are untrusted; every record needs at least one body line
    let body_lines = body.lines().count();
    let vertex_capacity = header.vertex_count.min(body_lines);
    let face_capacity = header.face_count.min(body_lines - vertex_capacity);

    let mut reader = PlyReader::new();
    reader.header = header;
    reader.data = MeshData::with_capacity(vertex_capacity, face_capacity);
    reader.state = reader.after_header();

    for (idx, line) in body.lines().enumerate() {
        if reader.state == State::Done {
            break;
        }
        reader.body_line(header_lines + idx + 1, line)?;
    }

    reader.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadErrorKind;
    use crate::loader::{load_mesh_from_bytes, MeshFormat};
    use nalgebra::Point3;

    const CUBE_CORNER: &str = "ply
format ascii 1.0
comment made by hand
element vertex 4
property float x
property float y
property float z
property uchar red
element face 2
property list uchar int vertex_indices
end_header
0 0 0 255
1 0 0 255
1 1 0 255
0 1 0 255
3 0 1 2
3 0 2 3
";

    #[test]
    fn test_ascii_ply() {
        let data = parse_ply(CUBE_CORNER.as_bytes()).unwrap();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.vertices[2], Point3::new(1.0, 1.0, 0.0));
        assert_eq!(
            data.faces,
            vec![Face::new(vec![0, 1, 2]), Face::new(vec![0, 2, 3])]
        );
    }

    #[test]
    fn test_header() {
        let (header, offset) = parse_ply_header(CUBE_CORNER.as_bytes()).unwrap();
        assert_eq!(header.encoding, PlyEncoding::Ascii);
        assert_eq!(header.vertex_count, 4);
        assert_eq!(header.face_count, 2);
        assert!(CUBE_CORNER[offset..].starts_with("0 0 0 255"));
    }

    #[test]
    fn test_face_element_declared_first() {
        let input = "ply\nformat ascii 1.0\nelement face 1\nproperty list uchar int vertex_indices\n\
                     element vertex 3\nproperty float x\nproperty float y\nproperty float z\nend_header\n\
                     0 0 0\n1 0 0\n0 1 0\n3 2 1 0\n";
        let data = parse_ply(input.as_bytes()).unwrap();
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.faces, vec![Face::new(vec![2, 1, 0])]);
    }

    #[test]
    fn test_quad_faces_and_trailing_content() {
        let input = "ply\nformat ascii 1.0\nelement vertex 4\nelement face 1\nend_header\n\
                     0 0 0\n1 0 0\n1 1 0\n0 1 0\n4 0 1 2 3\nthis is not read\n";
        let data = parse_ply(input.as_bytes()).unwrap();
        assert_eq!(data.faces, vec![Face::new(vec![0, 1, 2, 3])]);
    }

    #[test]
    fn test_short_lines_skipped() {
        let input = "ply\nformat ascii 1.0\nelement vertex 3\nelement face 1\nend_header\n\
                     0 0 0\n\n1 0\n1 0 0\n0 1 0\n3 0 1\n3 0 1 2\n";
        let data = parse_ply(input.as_bytes()).unwrap();
        assert_eq!(data.vertices.len(), 3);
        assert_eq!(data.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(data.faces, vec![Face::new(vec![0, 1, 2])]);
    }

    #[test]
    fn test_truncated_body_is_tolerated() {
        let input = "ply\nformat ascii 1.0\nelement vertex 1\nend_header\n";
        let data = parse_ply(input.as_bytes()).unwrap();
        assert!(data.vertices.is_empty());
    }

    #[test]
    fn test_binary_rejected() {
        let mut input = b"ply\nformat binary_little_endian 1.0\nelement vertex 1\n\
                          property float x\nproperty float y\nproperty float z\nend_header\n"
            .to_vec();
        input.extend_from_slice(&[0x00, 0x00, 0x80, 0x3f, 0xff, 0xfe, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(
            parse_ply(&input).unwrap_err(),
            MeshError::UnsupportedEncoding(_)
        ));
    }

    #[test]
    fn test_non_text_body_rejected() {
        let mut input = b"ply\nformat ascii 1.0\nelement vertex 1\nend_header\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        assert!(matches!(
            parse_ply(&input).unwrap_err(),
            MeshError::UnsupportedEncoding(_)
        ));
    }

    #[test]
    fn test_missing_end_header() {
        let input = "ply\nformat ascii 1.0\nelement vertex 1\n0 0 0\n";
        assert!(matches!(
            parse_ply(input.as_bytes()).unwrap_err(),
            MeshError::Parse { .. }
        ));
    }

    #[test]
    fn test_missing_magic() {
        let input = "format ascii 1.0\nelement vertex 1\nend_header\n0 0 0\n";
        assert!(matches!(
            parse_ply(input.as_bytes()).unwrap_err(),
            MeshError::Parse { line: 1, .. }
        ));
    }

    #[test]
    fn test_bad_element_count() {
        let input = "ply\nformat ascii 1.0\nelement vertex many\nend_header\n";
        assert!(matches!(
            parse_ply(input.as_bytes()).unwrap_err(),
            MeshError::Parse { line: 3, .. }
        ));
    }

    #[test]
    fn test_malformed_vertex_reports_line() {
        let input = "ply\nformat ascii 1.0\nelement vertex 2\nend_header\n0 0 0\n1 q 0\n";
        match parse_ply(input.as_bytes()).unwrap_err() {
            MeshError::Parse { line, content, .. } => {
                assert_eq!(line, 6);
                assert_eq!(content, "1 q 0");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_face_index() {
        let input = "ply\nformat ascii 1.0\nelement vertex 3\nelement face 1\nend_header\n\
                     0 0 0\n1 0 0\n0 1 0\n3 0 -1 2\n";
        assert!(matches!(
            parse_ply(input.as_bytes()).unwrap_err(),
            MeshError::IndexOutOfRange { index: -1, .. }
        ));
    }

    #[test]
    fn test_huge_declared_vertex_count() {
        let input = b"ply\nformat ascii 1.0\nelement vertex 18446744073709551615\nend_header\n";
        let err = load_mesh_from_bytes(MeshFormat::Ply, input).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::EmptyModel);
    }

    #[test]
    fn test_huge_declared_face_count() {
        let input = b"ply\nformat ascii 1.0\nelement vertex 1\nelement face 4611686018427387903\n\
                      end_header\n0 0 0\n";
        let mesh = load_mesh_from_bytes(MeshFormat::Ply, input).unwrap();
        assert_eq!(mesh.vertex_count(), 1);
        assert_eq!(mesh.face_count(), 0);
    }
}

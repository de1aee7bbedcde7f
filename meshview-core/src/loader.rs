/// Mesh loading: extension dispatch, parsing and validation
use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{LoadError, MeshError, MeshResult};
use crate::geometry::{Mesh, MeshData};
use crate::{obj, ply, stl};

/// Mesh file formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    Obj,
    Ply,
    Stl,
}

impl MeshFormat {
    pub const ALL: [MeshFormat; 3] = [MeshFormat::Obj, MeshFormat::Ply, MeshFormat::Stl];

    /// Detect the format from a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "obj" => Some(MeshFormat::Obj),
            "ply" => Some(MeshFormat::Ply),
            "stl" => Some(MeshFormat::Stl),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> MeshResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str());
        ext.and_then(Self::from_extension)
            .ok_or_else(|| MeshError::UnsupportedFormat {
                extension: ext.map(String::from),
            })
    }

    pub fn extension(self) -> &'static str {
        match self {
            MeshFormat::Obj => "obj",
            MeshFormat::Ply => "ply",
            MeshFormat::Stl => "stl",
        }
    }

    /// Run this format's parser over a whole file's contents.
    pub fn parse(self, bytes: &[u8]) -> MeshResult<MeshData> {
        match self {
            MeshFormat::Obj => {
                let text = std::str::from_utf8(bytes).map_err(|_| {
                    MeshError::UnsupportedEncoding("OBJ data is not valid text".to_string())
                })?;
                obj::parse_obj(text)
            }
            MeshFormat::Ply => ply::parse_ply(bytes),
            MeshFormat::Stl => stl::parse_ascii_stl(bytes),
        }
    }
}

impl fmt::Display for MeshFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MeshFormat::Obj => "OBJ",
            MeshFormat::Ply => "PLY",
            MeshFormat::Stl => "STL",
        })
    }
}

/// Load and validate the mesh at `path`.
///
/// The format is picked from the file extension. Every failure, whatever the
/// format, comes back as a [`LoadError`] reading `load failed: <reason>`; the
/// caller keeps whatever mesh it held before.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, LoadError> {
    let path = path.as_ref();
    let result = MeshFormat::from_path(path).and_then(|format| {
        info!(?path, %format, "loading mesh");
        let bytes = std::fs::read(path)?;
        build(format, &bytes)
    });

    result.map_err(|source| {
        warn!(?path, error = %source, "mesh load failed");
        LoadError::new(Some(path.to_path_buf()), source)
    })
}

/// Load a mesh from an in-memory buffer of the given format.
pub fn load_mesh_from_bytes(format: MeshFormat, bytes: &[u8]) -> Result<Mesh, LoadError> {
    build(format, bytes).map_err(|source| LoadError::new(None, source))
}

fn build(format: MeshFormat, bytes: &[u8]) -> MeshResult<Mesh> {
    let mesh = Mesh::from_data(format.parse(bytes)?)?;
    let bounds = mesh.bounds();
    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "loaded {format} mesh"
    );
    debug!(min = ?bounds.min, max = ?bounds.max, "view bounds");
    Ok(mesh)
}

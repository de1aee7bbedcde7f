/// meshview core library: mesh ingestion and view preparation
///
/// This library turns OBJ, ASCII PLY and ASCII STL files into a validated
/// [`Mesh`], fan-triangulates its faces, frames it with a padded bounding box,
/// and holds the display parameters a rendering backend reads each redraw.
/// It owns no windows, no global state and no "current" mesh: every load
/// returns a fresh value and the caller decides what to keep.

pub mod bounds;
pub mod error;
pub mod geometry;
mod lex;
pub mod loader;
pub mod obj;
pub mod ply;
pub mod projection;
pub mod render;
pub mod stl;
pub mod transform;
pub mod triangulate;

// Re-export commonly used types
pub use bounds::{compute_view_bounds, ViewBounds};
pub use error::{LoadError, LoadErrorKind, MeshError, MeshResult};
pub use geometry::{Face, Mesh, MeshData, Vertex};
pub use loader::{load_mesh, load_mesh_from_bytes, MeshFormat};
pub use projection::{Camera, ProjectionMode};
pub use render::{CameraOrientation, RenderParameters, RenderSettings, Rgb, ViewPreset};
pub use transform::Transform;
pub use triangulate::{triangulate, Triangle, Triangles};

/// Bounding-box framing of a vertex set
use nalgebra::{Point3, Vector3};

/// Extra room added around the model, as a fraction of its half extent.
pub const PADDING: f64 = 0.1;

/// Smallest padded half extent; keeps coincident vertices from collapsing the view.
pub const MIN_HALF_EXTENT: f64 = 1e-6;

/// Floor on the half extent around `center`, at least a few ulps of its
/// largest coordinate so `center ± floor` never rounds back to `center`.
fn half_extent_floor(center: &Point3<f64>) -> f64 {
    MIN_HALF_EXTENT.max(center.coords.amax() * f64::EPSILON * 4.0)
}

/// A cubic view volume centred on a model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl ViewBounds {
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Half the edge length of the (cubic) volume, padding included.
    pub fn half_extent(&self) -> f64 {
        (self.max.x - self.min.x) / 2.0
    }

    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|axis| point[axis] >= self.min[axis] && point[axis] <= self.max[axis])
    }
}

impl Default for ViewBounds {
    fn default() -> Self {
        Self {
            min: Point3::new(-1.0, -1.0, -1.0),
            max: Point3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Per-axis minimum and maximum of `vertices`, or `None` if there are none.
pub fn extents(vertices: &[Point3<f64>]) -> Option<(Point3<f64>, Point3<f64>)> {
    let first = vertices.first()?;
    Some(vertices.iter().skip(1).fold((*first, *first), |(lo, hi), v| {
        (lo.inf(v), hi.sup(v))
    }))
}

/// Symmetric view volume around `vertices`.
///
/// The largest per-axis range is applied to all three axes so the model is
/// never clipped anisotropically, then padded by [`PADDING`].
pub fn compute_view_bounds(vertices: &[Point3<f64>]) -> Option<ViewBounds> {
    let (lo, hi) = extents(vertices)?;
    let center = nalgebra::center(&lo, &hi);
    let half_extent = (hi - lo).max() / 2.0;
    let padded = (half_extent + half_extent * PADDING).max(half_extent_floor(&center));
    let offset = Vector3::repeat(padded);

    Some(ViewBounds {
        min: center - offset,
        max: center + offset,
    })
}

/// Camera and projection utilities
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

use crate::bounds::ViewBounds;
use crate::render::CameraOrientation;
use crate::transform::Transform;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Orthographic,
    Perspective,
}

/// Vertical field of view used in perspective mode.
pub const PERSPECTIVE_FOV: f64 = std::f64::consts::FRAC_PI_4;

/// Camera framing a model's view bounds from an orbit orientation
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub target: Point3<f64>,
    pub orientation: CameraOrientation,
    /// Radius of the sphere around `target` that must stay visible.
    pub radius: f64,
    /// Width over height of the viewport, in square units.
    pub aspect: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Frame `bounds` so its whole cube stays on screen from any orientation.
    pub fn framing(bounds: &ViewBounds, orientation: CameraOrientation, aspect: f64) -> Self {
        Self {
            target: bounds.center(),
            orientation,
            radius: bounds.half_extent() * 3f64.sqrt(),
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            mode: ProjectionMode::Orthographic,
        }
    }

    pub fn with_mode(mut self, mode: ProjectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Eye distance from the target.
    pub fn distance(&self) -> f64 {
        match self.mode {
            ProjectionMode::Orthographic => self.radius * 2.0,
            ProjectionMode::Perspective => {
                let half_fov = self.fov_for_fit() / 2.0;
                self.radius / half_fov.sin()
            }
        }
    }

    pub fn position(&self) -> Point3<f64> {
        self.target + Transform::orbit_direction(self.orientation) * self.distance()
    }

    /// Direction from the eye towards the target.
    pub fn forward(&self) -> Vector3<f64> {
        -Transform::orbit_direction(self.orientation)
    }

    pub fn view(&self) -> Isometry3<f64> {
        Transform::orbit_view(self.orientation, &self.target, self.distance())
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        self.view().to_homogeneous()
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        let distance = self.distance();
        let near = (distance - self.radius).max(self.radius * 1e-3);
        let far = distance + self.radius;
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov_for_fit(), near, far)
            }
            ProjectionMode::Orthographic => {
                let half_height = self.radius.max(self.radius / self.aspect);
                let half_width = half_height * self.aspect;
                Matrix4::new_orthographic(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    near,
                    far,
                )
            }
        }
    }

    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Project a world point to screen space.
    ///
    /// Returns `(x, y, depth)` with `(0, 0)` at the top-left corner and smaller
    /// depth nearer the eye, or `None` when the point is outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        project(&self.view_projection(), point, width, height)
    }

    /// Widen the vertical field of view on narrow viewports so the sphere still fits horizontally.
    fn fov_for_fit(&self) -> f64 {
        if self.aspect >= 1.0 {
            PERSPECTIVE_FOV
        } else {
            2.0 * ((PERSPECTIVE_FOV / 2.0).tan() / self.aspect).atan()
        }
    }
}

/// Project through a precomputed view-projection matrix.
pub fn project(
    view_projection: &Matrix4<f64>,
    point: &Point3<f64>,
    width: u32,
    height: u32,
) -> Option<(f64, f64, f64)> {
    let ndc = view_projection.transform_point(point);
    if !ndc.iter().all(|c| c.is_finite()) {
        return None;
    }

    // Clip test
    let inside = |c: f64| (-1.0 - 1e-9..=1.0 + 1e-9).contains(&c);
    if !(inside(ndc.x) && inside(ndc.y) && inside(ndc.z)) {
        return None;
    }

    // Convert to screen space
    let screen_x = (ndc.x + 1.0) * 0.5 * width as f64;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f64;

    Some((screen_x, screen_y, ndc.z))
}
